use crate::{APIResponse, BaseClient};
use notifier_api_structs::*;
use notifier_domain::ReminderId;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub use create_reminder::RequestBody as CreateReminderInput;

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateReminderInput,
    ) -> APIResponse<create_reminder::APIResponse> {
        self.base
            .post(input, "reminders".into(), StatusCode::CREATED)
            .await
    }

    pub async fn list(&self) -> APIResponse<get_reminders::APIResponse> {
        self.base.get("reminders".into(), StatusCode::OK).await
    }

    pub async fn delete(
        &self,
        reminder_id: &ReminderId,
    ) -> APIResponse<delete_reminder::APIResponse> {
        self.base
            .delete(format!("reminders/{}", reminder_id), StatusCode::OK)
            .await
    }

    /// Triggers due processing, requires the trigger secret
    pub async fn process_due(&self) -> APIResponse<process_due_reminders::APIResponse> {
        self.base
            .post((), "reminders/process-due".into(), StatusCode::OK)
            .await
    }
}
