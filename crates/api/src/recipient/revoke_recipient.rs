use crate::error::NotifierError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::{dtos::RecipientDTO, revoke_recipient::*};
use notifier_domain::RecipientId;
use notifier_infra::NotifierContext;
use tracing::info;

pub async fn revoke_recipient_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = RevokeRecipientUseCase {
        recipient_id: path.recipient_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|recipient| HttpResponse::Ok().json(APIResponse::new(recipient)))
        .map_err(NotifierError::from)
}

/// Stops deliveries to a granted user. Existing reminders are untouched, the
/// recipient set is recomputed on every delivery.
#[derive(Debug)]
pub struct RevokeRecipientUseCase {
    pub recipient_id: RecipientId,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    IsAdmin(RecipientId),
    NotFound(RecipientId),
}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::IsAdmin(recipient_id) => Self::Conflict(format!(
                "The recipient with id: {} is an administrator and cannot be revoked",
                recipient_id
            )),
            UseCaseError::NotFound(recipient_id) => Self::NotFound(format!(
                "The recipient with id: {}, was not found.",
                recipient_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RevokeRecipientUseCase {
    type Response = RecipientDTO;

    type Error = UseCaseError;

    const NAME: &'static str = "RevokeRecipient";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let recipient_id = RecipientId::new(self.recipient_id.as_str().trim());
        if ctx.recipients.is_admin(&recipient_id) {
            return Err(UseCaseError::IsAdmin(recipient_id));
        }
        if !ctx.recipients.revoke(&recipient_id) {
            return Err(UseCaseError::NotFound(recipient_id));
        }

        info!("Revoked recipient: {}", recipient_id);
        Ok(RecipientDTO::new(recipient_id, false))
    }
}
