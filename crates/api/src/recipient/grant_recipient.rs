use crate::error::NotifierError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::{dtos::RecipientDTO, grant_recipient::*};
use notifier_domain::RecipientId;
use notifier_infra::NotifierContext;
use tracing::info;

pub async fn grant_recipient_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = GrantRecipientUseCase {
        recipient_id: path.recipient_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|recipient| HttpResponse::Created().json(APIResponse::new(recipient)))
        .map_err(NotifierError::from)
}

/// Allows a user to receive reminders from the next delivery on
#[derive(Debug)]
pub struct GrantRecipientUseCase {
    pub recipient_id: RecipientId,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidRecipientId,
    AlreadyAuthorized(RecipientId),
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidRecipientId => {
                Self::BadClientData("The recipient id must not be empty".into())
            }
            UseCaseError::AlreadyAuthorized(recipient_id) => Self::Conflict(format!(
                "The recipient with id: {} already receives reminders",
                recipient_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GrantRecipientUseCase {
    type Response = RecipientDTO;

    type Error = UseCaseError;

    const NAME: &'static str = "GrantRecipient";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let recipient_id = RecipientId::new(self.recipient_id.as_str().trim());
        if recipient_id.as_str().is_empty() {
            return Err(UseCaseError::InvalidRecipientId);
        }
        if ctx.recipients.is_authorized(&recipient_id) || !ctx.recipients.grant(recipient_id.clone())
        {
            return Err(UseCaseError::AlreadyAuthorized(recipient_id));
        }

        info!("Granted recipient: {}", recipient_id);
        Ok(RecipientDTO::new(recipient_id, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notifier_infra::RecipientRegistry;
    use std::sync::Arc;

    fn setup() -> NotifierContext {
        let mut ctx = NotifierContext::create_inmemory();
        ctx.recipients = Arc::new(RecipientRegistry::new(
            &[RecipientId::new("1")],
            &[RecipientId::new("2")],
        ));
        ctx
    }

    fn grant(id: &str) -> GrantRecipientUseCase {
        GrantRecipientUseCase {
            recipient_id: RecipientId::new(id),
        }
    }

    #[actix_web::main]
    #[test]
    async fn granted_user_is_included_in_recipients() {
        let ctx = setup();

        let res = execute(grant(" 7 "), &ctx).await;
        assert_eq!(res, Ok(RecipientDTO::new(RecipientId::new("7"), false)));
        assert!(ctx.recipients.is_authorized(&RecipientId::new("7")));
        assert_eq!(
            ctx.recipients.current_recipients(),
            vec![
                RecipientId::new("1"),
                RecipientId::new("2"),
                RecipientId::new("7")
            ]
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_already_authorized_users() {
        let ctx = setup();

        for id in ["1", "2"] {
            assert_eq!(
                execute(grant(id), &ctx).await,
                Err(UseCaseError::AlreadyAuthorized(RecipientId::new(id)))
            );
        }
        assert_eq!(
            execute(grant("  "), &ctx).await,
            Err(UseCaseError::InvalidRecipientId)
        );
        assert_eq!(ctx.recipients.current_recipients().len(), 2);
    }
}
