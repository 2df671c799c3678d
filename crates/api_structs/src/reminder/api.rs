use crate::dtos::ReminderDTO;
use notifier_domain::{Reminder, ReminderId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod create_reminder {
    use super::*;
    use notifier_domain::ScheduleKind;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub kind: ScheduleKind,
        /// `YYYY-MM-DD`, only for one-time reminders
        #[serde(default)]
        pub date: Option<String>,
        /// `HH:MM` wall-clock time in the configured timezone
        pub time: String,
        /// Comma separated weekdays, e.g. `mon,wed` or `пн,ср`
        #[serde(default)]
        pub days: Option<String>,
        #[serde(default)]
        pub day_of_month: Option<u32>,
        pub text: String,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminders {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>) -> Self {
            Self {
                reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
            }
        }
    }
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ReminderId,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod process_due_reminders {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Reminders that were delivered and rescheduled or retired
        pub processed: usize,
        pub delivery_failures: usize,
        /// Reminders that stay due because their state could not be written
        pub store_failures: usize,
        /// Reminders left for the next run because the deadline was exceeded
        pub deferred: usize,
    }
}
