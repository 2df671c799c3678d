use crate::error::NotifierError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::create_reminder::*;
use notifier_domain::{
    Reminder, ReminderId, ReminderSchedule, ScheduleError, ScheduleKind, ScheduleParams,
};
use notifier_infra::{NotifierContext, ReminderRepoError};
use tracing::error;

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_admin_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateReminderUseCase {
        kind: body.kind,
        params: ScheduleParams {
            date: body.date,
            time: body.time,
            days: body.days,
            day_of_month: body.day_of_month,
        },
        text: body.text,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(NotifierError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub kind: ScheduleKind,
    pub params: ScheduleParams,
    pub text: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidSchedule(ScheduleError),
    EmptyText,
    DuplicateId(ReminderId),
    StorageError,
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidSchedule(e) => Self::BadClientData(e.to_string()),
            UseCaseError::EmptyText => {
                Self::BadClientData("The reminder text must not be empty".into())
            }
            UseCaseError::DuplicateId(id) => Self::Conflict(format!(
                "A reminder with id: {} already exists, please try again",
                id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

impl From<ScheduleError> for UseCaseError {
    fn from(e: ScheduleError) -> Self {
        Self::InvalidSchedule(e)
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(UseCaseError::EmptyText);
        }

        let schedule = ReminderSchedule::parse(self.kind, &self.params)?;
        let now = ctx
            .sys
            .now_in(&ctx.config.timezone)
            .ok_or(UseCaseError::StorageError)?;
        let fire_at = schedule.first_fire_at(&now)?;

        let prefix = schedule.id_prefix();
        let sequence = ctx
            .repos
            .reminders
            .next_sequence(&prefix)
            .await
            .map_err(|e| {
                error!("Unable to allocate reminder id for prefix {}: {:?}", prefix, e);
                UseCaseError::StorageError
            })?;

        let reminder = Reminder::new(
            ReminderId::new(&prefix, sequence),
            fire_at,
            text.to_string(),
            schedule.recurrence(),
        )
        .with_time_of_day(schedule.time_of_day());

        match ctx.repos.reminders.insert(&reminder).await {
            Ok(_) => Ok(reminder),
            Err(ReminderRepoError::DuplicateId(id)) => {
                error!(
                    "Reminder id allocation invariant violated, id: {} is already taken",
                    id
                );
                Err(UseCaseError::DuplicateId(id))
            }
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}
