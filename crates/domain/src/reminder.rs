use crate::shared::{entity::Entity, recurrence::RecurrenceRule};
use chrono::prelude::*;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt::Display, str::FromStr};

/// Human readable `Reminder` identifier of the form `<prefix>-<sequence>`,
/// e.g. `DLY-0900-0` or `WKY-MON,WED-1000-2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(String);

impl ReminderId {
    pub fn new(prefix: &str, sequence: u64) -> Self {
        Self(format!("{}-{}", prefix, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The sequence number of this id if it was allocated for the given prefix
    pub fn sequence_for(&self, prefix: &str) -> Option<u64> {
        self.0
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|seq| seq.parse::<u64>().ok())
    }
}

impl Display for ReminderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReminderId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

impl From<String> for ReminderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A scheduled notification which is delivered to every authorized recipient
/// at `fire_at`. Reminders without a `repeat` rule fire once and are then retired.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ReminderId,
    /// The next (or only) moment this `Reminder` should be delivered
    pub fire_at: DateTime<Tz>,
    /// The message payload, opaque to the scheduler
    pub text: String,
    pub repeat: Option<RecurrenceRule>,
    /// Local time of day the reminder was requested for. Differs from the
    /// local time of `fire_at` when that time was skipped by a daylight
    /// saving transition.
    pub time_of_day: NaiveTime,
}

impl Reminder {
    pub fn new(
        id: ReminderId,
        fire_at: DateTime<Tz>,
        text: String,
        repeat: Option<RecurrenceRule>,
    ) -> Self {
        Self {
            id,
            time_of_day: fire_at.time(),
            fire_at,
            text,
            repeat,
        }
    }

    pub fn with_time_of_day(mut self, time_of_day: NaiveTime) -> Self {
        self.time_of_day = time_of_day;
        self
    }

    pub fn fire_at_millis(&self) -> i64 {
        self.fire_at.timestamp_millis()
    }

    pub fn is_due(&self, before_inc: i64) -> bool {
        self.fire_at_millis() <= before_inc
    }

    /// When this `Reminder` should fire after the current `fire_at`,
    /// `None` for one-time reminders
    pub fn next_fire_at(&self) -> Option<DateTime<Tz>> {
        self.repeat
            .as_ref()
            .map(|rule| rule.next_occurrence(&self.fire_at, self.time_of_day))
    }
}

impl Entity for Reminder {
    type Id = ReminderId;

    fn id(&self) -> &ReminderId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::{Europe::Oslo, UTC};

    #[test]
    fn parses_sequence_for_prefix() {
        let id = ReminderId::new("DLY-0900", 12);
        assert_eq!(id.as_str(), "DLY-0900-12");
        assert_eq!(id.sequence_for("DLY-0900"), Some(12));
        assert_eq!(id.sequence_for("DLY-09"), None);
        assert_eq!(id.sequence_for("MTH-31-0900"), None);
    }

    #[test]
    fn computes_next_fire_at() {
        let fire_at = UTC.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).single().unwrap();
        let once = Reminder::new(ReminderId::new("ONE-202401020900", 0), fire_at, "once".into(), None);
        assert!(once.next_fire_at().is_none());
        assert!(once.is_due(fire_at.timestamp_millis()));
        assert!(!once.is_due(fire_at.timestamp_millis() - 1));

        let daily = Reminder::new(
            ReminderId::new("DLY-0900", 0),
            fire_at,
            "standup".into(),
            Some(RecurrenceRule::Daily),
        );
        assert_eq!(
            daily.next_fire_at(),
            UTC.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).single()
        );
    }

    #[test]
    fn keeps_requested_time_after_shifted_fire_at() {
        // 02:30 was skipped on 2024-03-31 in Oslo, so that occurrence fires at 03:00
        let shifted = Oslo.with_ymd_and_hms(2024, 3, 31, 3, 0, 0).single().unwrap();
        let requested = NaiveTime::from_hms_opt(2, 30, 0).unwrap();
        let reminder = Reminder::new(
            ReminderId::new("DLY-0230", 0),
            shifted,
            "night shift".into(),
            Some(RecurrenceRule::Daily),
        )
        .with_time_of_day(requested);

        assert_eq!(
            reminder.next_fire_at(),
            Oslo.with_ymd_and_hms(2024, 4, 1, 2, 30, 0).single()
        );
    }
}
