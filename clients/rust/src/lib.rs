mod base;
mod recipient;
mod reminder;
mod status;

pub use base::APIError;
pub(crate) use base::{APIResponse, BaseClient};
pub use notifier_api_structs::dtos::{RecipientDTO, ReminderDTO};
pub use notifier_domain::{RecipientId, RecurrenceRule, ReminderId, ScheduleKind};
pub use recipient::RecipientClient;
pub use reminder::{CreateReminderInput, ReminderClient};
use status::StatusClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotifierSDK {
    pub recipient: RecipientClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
}

impl NotifierSDK {
    fn create(base: BaseClient) -> Self {
        let base = Arc::new(base);
        let recipient = RecipientClient::new(base.clone());
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            recipient,
            reminder,
            status,
        }
    }

    pub fn new(address: String) -> Self {
        let base = BaseClient::new(address);
        Self::create(base)
    }

    pub fn new_admin(address: String, api_key: String) -> Self {
        let mut base = BaseClient::new(address);
        base.set_api_key(api_key);

        Self::create(base)
    }

    pub fn new_trigger(address: String, trigger_secret: String) -> Self {
        let mut base = BaseClient::new(address);
        base.set_trigger_secret(trigger_secret);

        Self::create(base)
    }
}
