use crate::error::NotifierError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::delete_reminder::*;
use notifier_domain::{Reminder, ReminderId};
use notifier_infra::{NotifierContext, ReminderRepoError};

pub async fn delete_reminder_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = DeleteReminderUseCase {
        reminder_id: path.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(NotifierError::from)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub reminder_id: ReminderId,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ReminderId),
    StorageError,
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.reminders.delete(&self.reminder_id).await {
            Ok(reminder) => Ok(reminder),
            Err(ReminderRepoError::NotFound(id)) => Err(UseCaseError::NotFound(id)),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use notifier_domain::RecurrenceRule;

    #[actix_web::main]
    #[test]
    async fn deletes_reminder_once() {
        let ctx = NotifierContext::create_inmemory();
        let reminder = Reminder::new(
            ReminderId::new("DLY-0900", 0),
            chrono_tz::UTC.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(),
            "standup".into(),
            Some(RecurrenceRule::Daily),
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let usecase = DeleteReminderUseCase {
            reminder_id: reminder.id.clone(),
        };
        assert_eq!(execute(usecase, &ctx).await, Ok(reminder.clone()));

        let usecase = DeleteReminderUseCase {
            reminder_id: reminder.id.clone(),
        };
        assert_eq!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::NotFound(reminder.id))
        );
    }
}
