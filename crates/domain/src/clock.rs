use chrono::{prelude::*, Duration};
use chrono_tz::Tz;

/// Interprets a wall-clock timestamp in the given timezone.
///
/// An ambiguous local time (the repeated hour when clocks fall back) resolves
/// to the earliest instant. A local time skipped by a spring-forward
/// transition is moved to the first valid local time after the gap.
pub fn localize(tz: &Tz, naive: &NaiveDateTime) -> DateTime<Tz> {
    if let Some(dt) = tz.from_local_datetime(naive).earliest() {
        return dt;
    }
    for minutes in (15..=180).step_by(15) {
        let shifted = *naive + Duration::minutes(minutes);
        if let Some(dt) = tz.from_local_datetime(&shifted).earliest() {
            return dt;
        }
    }
    tz.from_utc_datetime(naive)
}

/// The instant given by a unix timestamp in millis, expressed in the given timezone
pub fn from_timestamp_millis(tz: &Tz, millis: i64) -> Option<DateTime<Tz>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.with_timezone(tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Oslo;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn localizes_regular_time() {
        let dt = localize(&Oslo, &naive(2024, 1, 10, 9, 0));
        assert_eq!(dt.naive_local(), naive(2024, 1, 10, 9, 0));
        assert_eq!(dt.naive_utc(), naive(2024, 1, 10, 8, 0));
    }

    #[test]
    fn localizes_time_inside_spring_forward_gap() {
        // Clocks jump from 02:00 to 03:00 on 2024-03-31 in Oslo
        let dt = localize(&Oslo, &naive(2024, 3, 31, 2, 30));
        assert_eq!(dt.naive_local(), naive(2024, 3, 31, 3, 0));
    }

    #[test]
    fn localizes_ambiguous_time_to_earliest() {
        // 02:30 happens twice on 2024-10-27 in Oslo
        let dt = localize(&Oslo, &naive(2024, 10, 27, 2, 30));
        assert_eq!(dt.naive_utc(), naive(2024, 10, 27, 0, 30));
    }

    #[test]
    fn converts_timestamp_millis() {
        let dt = from_timestamp_millis(&Oslo, 1704099600000).unwrap();
        assert_eq!(dt.naive_local(), naive(2024, 1, 1, 10, 0));
    }
}
