use notifier_domain::RecipientId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipientDTO {
    pub id: RecipientId,
    /// Administrators always receive reminders and cannot be revoked
    pub admin: bool,
}

impl RecipientDTO {
    pub fn new(id: RecipientId, admin: bool) -> Self {
        Self { id, admin }
    }
}
