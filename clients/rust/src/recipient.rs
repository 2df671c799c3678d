use crate::{APIResponse, BaseClient};
use notifier_api_structs::*;
use notifier_domain::RecipientId;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct RecipientClient {
    base: Arc<BaseClient>,
}

impl RecipientClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn list(&self) -> APIResponse<get_recipients::APIResponse> {
        self.base.get("recipients".into(), StatusCode::OK).await
    }

    pub async fn grant(
        &self,
        recipient_id: &RecipientId,
    ) -> APIResponse<grant_recipient::APIResponse> {
        self.base
            .post((), format!("recipients/{}", recipient_id), StatusCode::CREATED)
            .await
    }

    pub async fn revoke(
        &self,
        recipient_id: &RecipientId,
    ) -> APIResponse<revoke_recipient::APIResponse> {
        self.base
            .delete(format!("recipients/{}", recipient_id), StatusCode::OK)
            .await
    }
}
