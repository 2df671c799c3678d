use crate::dtos::RecipientDTO;
use notifier_domain::RecipientId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientResponse {
    pub recipient: RecipientDTO,
}

impl RecipientResponse {
    pub fn new(recipient: RecipientDTO) -> Self {
        Self { recipient }
    }
}

pub mod get_recipients {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub recipients: Vec<RecipientDTO>,
    }

    impl APIResponse {
        pub fn new(recipients: Vec<RecipientDTO>) -> Self {
            Self { recipients }
        }
    }
}

pub mod grant_recipient {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub recipient_id: RecipientId,
    }

    pub type APIResponse = RecipientResponse;
}

pub mod revoke_recipient {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub recipient_id: RecipientId,
    }

    pub type APIResponse = RecipientResponse;
}
