use serde::{Deserialize, Serialize};

pub mod get_service_health {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message: String,
        /// Whether due reminders are processed on the internal interval.
        /// When `false` only external triggers process them.
        pub due_job_running: bool,
    }
}
