mod clock;
mod date;
mod recipient;
mod reminder;
mod schedule;
mod shared;

pub use chrono::Weekday;
pub use chrono_tz::Tz;
pub use clock::{from_timestamp_millis, localize};
pub use date::{get_month_length, is_leap_year, parse_date, parse_time_of_day};
pub use recipient::RecipientId;
pub use reminder::{Reminder, ReminderId};
pub use schedule::{ReminderSchedule, ScheduleError, ScheduleKind, ScheduleParams};
pub use shared::entity::Entity;
pub use shared::recurrence::{DayOfMonth, InvalidRuleError, RecurrenceRule, Weekdays};
