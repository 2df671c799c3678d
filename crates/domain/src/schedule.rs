use crate::{
    clock::localize,
    date::{next_month, parse_date, parse_time_of_day},
    shared::recurrence::{DayOfMonth, RecurrenceRule, Weekdays},
};
use chrono::{prelude::*, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ScheduleError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("The requested time is not in the future")]
    PastTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    Once,
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for ScheduleKind {
    type Err = ScheduleError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind.trim().to_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ScheduleError::InvalidFormat(format!(
                "Unknown reminder kind: {}",
                kind
            ))),
        }
    }
}

/// The raw parameters an administrator supplied for a new reminder
#[derive(Debug, Clone, Default)]
pub struct ScheduleParams {
    /// `YYYY-MM-DD`, one-time reminders only
    pub date: Option<String>,
    /// `HH:MM` in 24h form
    pub time: String,
    /// Comma separated weekday tokens, weekly reminders only
    pub days: Option<String>,
    /// Monthly reminders only
    pub day_of_month: Option<u32>,
}

/// A validated reminder schedule, ready to compute its first fire time
#[derive(Debug, Clone, PartialEq)]
pub enum ReminderSchedule {
    Once { date: NaiveDate, time: NaiveTime },
    Daily { time: NaiveTime },
    Weekly { days: Weekdays, time: NaiveTime },
    Monthly { day_of_month: DayOfMonth, time: NaiveTime },
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ScheduleError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim()),
        _ => Err(ScheduleError::InvalidFormat(format!(
            "Missing required parameter: {}",
            name
        ))),
    }
}

impl ReminderSchedule {
    pub fn parse(kind: ScheduleKind, params: &ScheduleParams) -> Result<Self, ScheduleError> {
        let time = parse_time_of_day(&params.time).map_err(|_| {
            ScheduleError::InvalidFormat(format!(
                "Time must be HH:MM in 24h form, got: {}",
                params.time
            ))
        })?;

        match kind {
            ScheduleKind::Once => {
                let datestr = required(&params.date, "date")?;
                let date = parse_date(datestr).map_err(|_| {
                    ScheduleError::InvalidFormat(format!(
                        "Date must be YYYY-MM-DD, got: {}",
                        datestr
                    ))
                })?;
                Ok(Self::Once { date, time })
            }
            ScheduleKind::Daily => Ok(Self::Daily { time }),
            ScheduleKind::Weekly => {
                let days = required(&params.days, "days")?
                    .parse::<Weekdays>()
                    .map_err(|e| ScheduleError::InvalidFormat(e.to_string()))?;
                Ok(Self::Weekly { days, time })
            }
            ScheduleKind::Monthly => {
                let day = params.day_of_month.ok_or_else(|| {
                    ScheduleError::InvalidFormat("Missing required parameter: dayOfMonth".into())
                })?;
                let day_of_month =
                    DayOfMonth::new(day).map_err(|e| ScheduleError::InvalidFormat(e.to_string()))?;
                Ok(Self::Monthly { day_of_month, time })
            }
        }
    }

    /// The requested local time of day
    pub fn time_of_day(&self) -> NaiveTime {
        match self {
            Self::Once { time, .. }
            | Self::Daily { time }
            | Self::Weekly { time, .. }
            | Self::Monthly { time, .. } => *time,
        }
    }

    pub fn recurrence(&self) -> Option<RecurrenceRule> {
        match self {
            Self::Once { .. } => None,
            Self::Daily { .. } => Some(RecurrenceRule::Daily),
            Self::Weekly { days, .. } => Some(RecurrenceRule::weekly(days.clone())),
            Self::Monthly { day_of_month, .. } => Some(RecurrenceRule::Monthly {
                day_of_month: *day_of_month,
            }),
        }
    }

    /// Deterministic id prefix describing the kind and parameters of this schedule
    pub fn id_prefix(&self) -> String {
        let time = self.time_of_day();
        let hhmm = format!("{:02}{:02}", time.hour(), time.minute());
        match self {
            Self::Once { date, .. } => format!(
                "ONE-{:04}{:02}{:02}{}",
                date.year(),
                date.month(),
                date.day(),
                hhmm
            ),
            Self::Daily { .. } => format!("DLY-{}", hhmm),
            Self::Weekly { days, .. } => format!("WKY-{}-{}", days, hhmm),
            Self::Monthly { day_of_month, .. } => {
                format!("MTH-{:02}-{}", day_of_month.day(), hhmm)
            }
        }
    }

    /// The first moment strictly after `now` this schedule fires, interpreted
    /// in the timezone of `now`
    pub fn first_fire_at(&self, now: &DateTime<Tz>) -> Result<DateTime<Tz>, ScheduleError> {
        let tz = now.timezone();
        let today = now.naive_local().date();
        let time = self.time_of_day();
        let at = |date: NaiveDate| localize(&tz, &date.and_time(time));

        match self {
            Self::Once { date, .. } => {
                let fire_at = at(*date);
                if fire_at <= *now {
                    return Err(ScheduleError::PastTime);
                }
                Ok(fire_at)
            }
            Self::Daily { .. } => {
                let fire_at = at(today);
                if fire_at > *now {
                    Ok(fire_at)
                } else {
                    Ok(at(today + Duration::days(1)))
                }
            }
            Self::Weekly { days, .. } => Ok((0..=7)
                .map(|offset| today + Duration::days(offset))
                .filter(|date| days.contains(date.weekday()))
                .map(|date| at(date))
                .find(|candidate| candidate > now)
                .unwrap_or_else(|| at(today + Duration::days(7)))),
            Self::Monthly { day_of_month, .. } => {
                let fire_at = at(day_of_month.in_month(today.year(), today.month()));
                if fire_at > *now {
                    return Ok(fire_at);
                }
                let (year, month) = next_month(today.year(), today.month());
                Ok(at(day_of_month.in_month(year, month)))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::{Europe::Samara, UTC};

    fn dt(tz: &Tz, y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        tz.with_ymd_and_hms(y, m, d, h, min, 0).single().unwrap()
    }

    fn params(time: &str) -> ScheduleParams {
        ScheduleParams {
            time: time.into(),
            ..Default::default()
        }
    }

    #[test]
    fn daily_fires_tomorrow_when_time_has_passed() {
        let schedule = ReminderSchedule::parse(ScheduleKind::Daily, &params("09:00")).unwrap();
        let now = dt(&UTC, 2024, 1, 1, 10, 0);
        assert_eq!(
            schedule.first_fire_at(&now).unwrap(),
            dt(&UTC, 2024, 1, 2, 9, 0)
        );
        let now = dt(&UTC, 2024, 1, 1, 8, 59);
        assert_eq!(
            schedule.first_fire_at(&now).unwrap(),
            dt(&UTC, 2024, 1, 1, 9, 0)
        );
        // Exactly now is not in the future
        let now = dt(&UTC, 2024, 1, 1, 9, 0);
        assert_eq!(
            schedule.first_fire_at(&now).unwrap(),
            dt(&UTC, 2024, 1, 2, 9, 0)
        );
        assert_eq!(schedule.id_prefix(), "DLY-0900");
        assert_eq!(schedule.recurrence(), Some(RecurrenceRule::Daily));
    }

    #[test]
    fn monthly_clamps_first_fire_in_short_month() {
        let mut p = params("00:00");
        p.day_of_month = Some(31);
        let schedule = ReminderSchedule::parse(ScheduleKind::Monthly, &p).unwrap();
        let now = dt(&UTC, 2024, 2, 10, 12, 0);
        let first = schedule.first_fire_at(&now).unwrap();
        assert_eq!(first, dt(&UTC, 2024, 2, 29, 0, 0));
        let next = schedule
            .recurrence()
            .unwrap()
            .next_occurrence(&first, schedule.time_of_day());
        assert_eq!(next, dt(&UTC, 2024, 3, 31, 0, 0));
        assert_eq!(schedule.id_prefix(), "MTH-31-0000");
    }

    #[test]
    fn monthly_moves_to_next_month_when_passed() {
        let mut p = params("09:30");
        p.day_of_month = Some(5);
        let schedule = ReminderSchedule::parse(ScheduleKind::Monthly, &p).unwrap();
        let now = dt(&UTC, 2024, 12, 5, 9, 30);
        assert_eq!(
            schedule.first_fire_at(&now).unwrap(),
            dt(&UTC, 2025, 1, 5, 9, 30)
        );
    }

    #[test]
    fn weekly_picks_earliest_future_day() {
        let mut p = params("10:00");
        p.days = Some("пн,ср".into());
        let schedule = ReminderSchedule::parse(ScheduleKind::Weekly, &p).unwrap();
        assert_eq!(schedule.id_prefix(), "WKY-MON,WED-1000");

        // Monday before 10:00 fires the same day
        let now = dt(&UTC, 2024, 1, 1, 9, 0);
        assert_eq!(
            schedule.first_fire_at(&now).unwrap(),
            dt(&UTC, 2024, 1, 1, 10, 0)
        );
        // Monday after 10:00 fires on Wednesday
        let now = dt(&UTC, 2024, 1, 1, 11, 0);
        assert_eq!(
            schedule.first_fire_at(&now).unwrap(),
            dt(&UTC, 2024, 1, 3, 10, 0)
        );
        // Wednesday after 10:00 fires next Monday
        let now = dt(&UTC, 2024, 1, 3, 10, 1);
        assert_eq!(
            schedule.first_fire_at(&now).unwrap(),
            dt(&UTC, 2024, 1, 8, 10, 0)
        );
    }

    #[test]
    fn weekly_single_day_passed_today_fires_next_week() {
        let mut p = params("10:00");
        p.days = Some("mon".into());
        let schedule = ReminderSchedule::parse(ScheduleKind::Weekly, &p).unwrap();
        let now = dt(&UTC, 2024, 1, 1, 10, 0);
        assert_eq!(
            schedule.first_fire_at(&now).unwrap(),
            dt(&UTC, 2024, 1, 8, 10, 0)
        );
    }

    #[test]
    fn once_rejects_past_time() {
        let mut p = params("09:00");
        p.date = Some("2024-01-01".into());
        let schedule = ReminderSchedule::parse(ScheduleKind::Once, &p).unwrap();
        assert_eq!(schedule.id_prefix(), "ONE-202401010900");
        assert!(schedule.recurrence().is_none());

        let now = dt(&UTC, 2024, 1, 1, 9, 0);
        assert_eq!(schedule.first_fire_at(&now), Err(ScheduleError::PastTime));
        let now = dt(&UTC, 2023, 12, 31, 9, 0);
        assert_eq!(
            schedule.first_fire_at(&now).unwrap(),
            dt(&UTC, 2024, 1, 1, 9, 0)
        );
    }

    #[test]
    fn interprets_wall_clock_in_timezone_of_now() {
        let mut p = params("09:00");
        p.date = Some("2024-06-01".into());
        let schedule = ReminderSchedule::parse(ScheduleKind::Once, &p).unwrap();
        let now = dt(&Samara, 2024, 5, 1, 12, 0);
        let fire_at = schedule.first_fire_at(&now).unwrap();
        assert_eq!(fire_at, dt(&Samara, 2024, 6, 1, 9, 0));
        // Samara is UTC+4
        assert_eq!(fire_at.naive_utc().hour(), 5);
    }

    #[test]
    fn rejects_malformed_parameters() {
        let invalid = vec![
            (ScheduleKind::Daily, params("25:00")),
            (ScheduleKind::Daily, params("9")),
            (ScheduleKind::Once, params("09:00")),
            (
                ScheduleKind::Once,
                ScheduleParams {
                    date: Some("2024-02-30".into()),
                    time: "09:00".into(),
                    ..Default::default()
                },
            ),
            (ScheduleKind::Weekly, params("09:00")),
            (
                ScheduleKind::Weekly,
                ScheduleParams {
                    days: Some("mon,xyz".into()),
                    time: "09:00".into(),
                    ..Default::default()
                },
            ),
            (ScheduleKind::Monthly, params("09:00")),
            (
                ScheduleKind::Monthly,
                ScheduleParams {
                    day_of_month: Some(32),
                    time: "09:00".into(),
                    ..Default::default()
                },
            ),
            (
                ScheduleKind::Monthly,
                ScheduleParams {
                    day_of_month: Some(0),
                    time: "09:00".into(),
                    ..Default::default()
                },
            ),
        ];
        for (kind, p) in invalid {
            match ReminderSchedule::parse(kind, &p) {
                Err(ScheduleError::InvalidFormat(_)) => (),
                other => panic!("Expected invalid format for {:?}, got {:?}", p, other),
            }
        }
    }

    #[test]
    fn parses_kind() {
        assert_eq!("Weekly".parse::<ScheduleKind>().unwrap(), ScheduleKind::Weekly);
        assert!("yearly".parse::<ScheduleKind>().is_err());
    }
}
