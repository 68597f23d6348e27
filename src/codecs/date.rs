//! ISO dates as `YYYYMMDD` integers.
//!
//! 0 is reserved for "absent" (one-way return dates) and doubles as the
//! malformed-input sentinel. Calendar math is delegated to chrono; the
//! weekday index follows the engine convention of 0 = Monday.

use chrono::{Datelike, NaiveDate};

fn parse(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// "YYYY-MM-DD" → YYYYMMDD; 0 for malformed or non-calendar input
pub fn date_to_int(date: &str) -> u32 {
    match parse(date) {
        Some(d) if d.year() > 0 => d.year() as u32 * 10_000 + d.month() * 100 + d.day(),
        _ => 0,
    }
}

/// YYYYMMDD → "YYYY-MM-DD"; "" for the 0 sentinel
pub fn int_to_date(date: u32) -> String {
    if date == 0 {
        return String::new();
    }
    format!("{:04}-{:02}-{:02}", date / 10_000, date / 100 % 100, date % 100)
}

/// Whole days from `from` to `to`; 0 when either date does not parse or
/// `to` precedes `from`
pub fn days_between(from: &str, to: &str) -> u32 {
    match (parse(from), parse(to)) {
        (Some(a), Some(b)) => b.signed_duration_since(a).num_days().max(0) as u32,
        _ => 0,
    }
}

/// Weekday index of an ISO date, 0 = Monday; 7 when the date is invalid
pub fn day_of_week_from_date(date: &str) -> u8 {
    match parse(date) {
        Some(d) => d.weekday().num_days_from_monday() as u8,
        None => 7,
    }
}
