use chrono::{NaiveDate, NaiveTime};

/// Parses a `YYYY-MM-DD` date. Single digit months and days are accepted.
pub fn parse_date(datestr: &str) -> anyhow::Result<NaiveDate> {
    let dates = datestr.split('-').collect::<Vec<_>>();
    if dates.len() != 3 {
        return Err(anyhow::Error::msg(datestr.to_string()));
    }
    let year = dates[0].parse::<i32>();
    let month = dates[1].parse::<u32>();
    let day = dates[2].parse::<u32>();

    let (year, month, day) = match (year, month, day) {
        (Ok(year), Ok(month), Ok(day)) => (year, month, day),
        _ => return Err(anyhow::Error::msg(datestr.to_string())),
    };
    if !(1970..=2100).contains(&year) || !(1..=12).contains(&month) {
        return Err(anyhow::Error::msg(datestr.to_string()));
    }

    let month_length = get_month_length(year, month);

    if day < 1 || day > month_length {
        return Err(anyhow::Error::msg(datestr.to_string()));
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| anyhow::Error::msg(datestr.to_string()))
}

/// Parses an `HH:MM` time of day in 24h form
pub fn parse_time_of_day(timestr: &str) -> anyhow::Result<NaiveTime> {
    let parts = timestr.trim().split(':').collect::<Vec<_>>();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty() || p.len() > 2) {
        return Err(anyhow::Error::msg(timestr.to_string()));
    }
    let hours = parts[0].parse::<u32>();
    let minutes = parts[1].parse::<u32>();
    match (hours, minutes) {
        (Ok(hours), Ok(minutes)) => NaiveTime::from_hms_opt(hours, minutes, 0)
            .ok_or_else(|| anyhow::Error::msg(timestr.to_string())),
        _ => Err(anyhow::Error::msg(timestr.to_string())),
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// The calendar month following the given one
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}
