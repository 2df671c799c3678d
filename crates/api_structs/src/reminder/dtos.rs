use notifier_domain::{RecurrenceRule, Reminder, ReminderId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ReminderId,
    /// RFC 3339 timestamp in the timezone of the reminder
    pub fire_at: String,
    pub fire_at_millis: i64,
    pub timezone: String,
    /// Requested local time of day, `HH:MM`
    pub time_of_day: String,
    pub text: String,
    pub repeat: Option<RecurrenceRule>,
    /// Human readable description of the recurrence, e.g. `weekly (MON,WED)`
    pub schedule: String,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        let schedule = reminder
            .repeat
            .as_ref()
            .map(|rule| rule.to_string())
            .unwrap_or_else(|| "once".into());
        Self {
            id: reminder.id.clone(),
            fire_at: reminder.fire_at.to_rfc3339(),
            fire_at_millis: reminder.fire_at_millis(),
            timezone: reminder.fire_at.timezone().name().to_string(),
            time_of_day: reminder.time_of_day.format("%H:%M").to_string(),
            text: reminder.text,
            repeat: reminder.repeat,
            schedule,
        }
    }
}
