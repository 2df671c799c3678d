use crate::{
    clock::localize,
    date::{get_month_length, next_month},
};
use chrono::{prelude::*, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum InvalidRuleError {
    #[error("A weekly recurrence needs at least one weekday")]
    NoWeekdays,
    #[error("Invalid weekday number: {0}, expected 0 (Monday) to 6 (Sunday)")]
    InvalidWeekdayNumber(u32),
    #[error("Unrecognized weekday: {0}")]
    InvalidWeekdayToken(String),
    #[error("Day of month must be between 1 and 31, got: {0}")]
    InvalidDayOfMonth(u32),
}

/// How a recurring `Reminder` derives its next fire time from the previous one.
///
/// The weekdays and day of month are fixed when the rule is created, the time
/// of day is the one the reminder was requested for. All arithmetic is done on
/// local wall-clock time, so a reminder at 09:00 keeps firing at 09:00 across
/// daylight saving transitions. A time skipped by a transition fires at the
/// first valid time after the gap on that day only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "freq", rename_all = "lowercase")]
pub enum RecurrenceRule {
    Daily,
    Weekly {
        #[serde(alias = "dows")]
        days: Weekdays,
    },
    Monthly {
        #[serde(alias = "dom")]
        day_of_month: DayOfMonth,
    },
}

impl RecurrenceRule {
    pub fn weekly(days: Weekdays) -> Self {
        Self::Weekly { days }
    }

    pub fn monthly(day_of_month: u32) -> Result<Self, InvalidRuleError> {
        Ok(Self::Monthly {
            day_of_month: DayOfMonth::new(day_of_month)?,
        })
    }

    pub fn next_occurrence(
        &self,
        current: &DateTime<Tz>,
        time_of_day: NaiveTime,
    ) -> DateTime<Tz> {
        let tz = current.timezone();
        let date = current.naive_local().date();

        let next_date = match self {
            Self::Daily => date + Duration::days(1),
            Self::Weekly { days } => (1..=7)
                .map(|offset| date + Duration::days(offset))
                .find(|candidate| days.contains(candidate.weekday()))
                .unwrap_or_else(|| date + Duration::days(7)),
            Self::Monthly { day_of_month } => {
                let (year, month) = next_month(date.year(), date.month());
                day_of_month.in_month(year, month)
            }
        };

        localize(&tz, &next_date.and_time(time_of_day))
    }
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly { days } => write!(f, "weekly ({})", days),
            Self::Monthly { day_of_month } => write!(f, "monthly (day {})", day_of_month),
        }
    }
}

/// Non-empty set of weekdays, persisted as days from Monday (Monday = 0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct Weekdays(Vec<u32>);

impl Weekdays {
    pub fn new<I: IntoIterator<Item = Weekday>>(days: I) -> Result<Self, InvalidRuleError> {
        Self::try_from(
            days.into_iter()
                .map(|d| d.num_days_from_monday())
                .collect::<Vec<_>>(),
        )
    }

    pub fn contains(&self, wday: Weekday) -> bool {
        self.0.contains(&wday.num_days_from_monday())
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().filter_map(|n| weekday_from_number(*n))
    }
}

impl TryFrom<Vec<u32>> for Weekdays {
    type Error = InvalidRuleError;

    fn try_from(mut days: Vec<u32>) -> Result<Self, Self::Error> {
        if let Some(invalid) = days.iter().find(|d| **d > 6) {
            return Err(InvalidRuleError::InvalidWeekdayNumber(*invalid));
        }
        days.sort_unstable();
        days.dedup();
        if days.is_empty() {
            return Err(InvalidRuleError::NoWeekdays);
        }
        Ok(Self(days))
    }
}

impl From<Weekdays> for Vec<u32> {
    fn from(days: Weekdays) -> Self {
        days.0
    }
}

fn weekday_from_number(n: u32) -> Option<Weekday> {
    match n {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

fn str_to_weekday(token: &str) -> Option<Weekday> {
    match token {
        "пн" | "mon" | "monday" => Some(Weekday::Mon),
        "вт" | "tue" | "tuesday" => Some(Weekday::Tue),
        "ср" | "wed" | "wednesday" => Some(Weekday::Wed),
        "чт" | "thu" | "thursday" => Some(Weekday::Thu),
        "пт" | "fri" | "friday" => Some(Weekday::Fri),
        "сб" | "sat" | "saturday" => Some(Weekday::Sat),
        "вс" | "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn weekday_to_str(wday: Weekday) -> &'static str {
    match wday {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

/// Parses a comma separated list of weekday tokens like `пн,ср` or `mon,wed`
impl FromStr for Weekdays {
    type Err = InvalidRuleError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim().to_lowercase().replace(' ', "");
        let mut days = Vec::new();
        for part in token.split(',').filter(|p| !p.is_empty()) {
            match str_to_weekday(part) {
                Some(wday) => days.push(wday),
                None => return Err(InvalidRuleError::InvalidWeekdayToken(part.to_string())),
            }
        }
        Self::new(days)
    }
}

impl Display for Weekdays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let days = self.iter().map(weekday_to_str).collect::<Vec<_>>();
        write!(f, "{}", days.join(","))
    }
}

/// Day of month in `[1, 31]`. Months shorter than the day clamp to their last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DayOfMonth(u32);

impl DayOfMonth {
    pub fn new(day: u32) -> Result<Self, InvalidRuleError> {
        if (1..=31).contains(&day) {
            Ok(Self(day))
        } else {
            Err(InvalidRuleError::InvalidDayOfMonth(day))
        }
    }

    pub fn day(&self) -> u32 {
        self.0
    }

    /// The date of this day in the given month, clamped to the month length
    pub fn in_month(&self, year: i32, month: u32) -> NaiveDate {
        let day = std::cmp::min(self.0, get_month_length(year, month));
        NaiveDate::from_ymd_opt(year, month, day).expect("Day to be clamped to the month length")
    }
}

impl TryFrom<u32> for DayOfMonth {
    type Error = InvalidRuleError;

    fn try_from(day: u32) -> Result<Self, Self::Error> {
        Self::new(day)
    }
}

impl From<DayOfMonth> for u32 {
    fn from(day: DayOfMonth) -> Self {
        day.0
    }
}

impl Display for DayOfMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
