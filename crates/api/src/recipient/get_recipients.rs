use crate::error::NotifierError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use notifier_api_structs::{dtos::RecipientDTO, get_recipients::*};
use notifier_infra::NotifierContext;

pub async fn get_recipients_controller(
    http_req: HttpRequest,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_admin_route(&http_req, &ctx)?;

    execute(GetRecipientsUseCase {}, &ctx)
        .await
        .map(|recipients| HttpResponse::Ok().json(APIResponse::new(recipients)))
        .map_err(NotifierError::from)
}

#[derive(Debug)]
pub struct GetRecipientsUseCase {}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {}

impl From<UseCaseError> for NotifierError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRecipientsUseCase {
    type Response = Vec<RecipientDTO>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetRecipients";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx
            .recipients
            .current_recipients()
            .into_iter()
            .map(|id| {
                let admin = ctx.recipients.is_admin(&id);
                RecipientDTO::new(id, admin)
            })
            .collect())
    }
}
