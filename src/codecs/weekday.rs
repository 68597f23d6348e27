//! Weekday names and bitmasks for the weekday filters.

/// Marker for an unknown weekday name
pub const INVALID_WEEKDAY: u8 = 7;

static NAMES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// mon..sun → 0..6; anything else → 7
pub fn day_of_week_from_str(name: &str) -> u8 {
    NAMES
        .iter()
        .position(|&n| n == name)
        .map(|i| i as u8)
        .unwrap_or(INVALID_WEEKDAY)
}

/// 0..6 → mon..sun; "" for anything else
pub fn day_of_week_to_str(code: u8) -> &'static str {
    NAMES.get(code as usize).copied().unwrap_or("")
}

/// CSV of weekday names → OR of `1 << code`; None when a token is unknown
pub fn weekdays_bitmask(days_of_week: &str) -> Option<u8> {
    let mut mask = 0u8;
    for token in days_of_week.split(',') {
        let code = day_of_week_from_str(token.trim());
        if code == INVALID_WEEKDAY {
            return None;
        }
        mask |= 1 << code;
    }
    Some(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_names() {
        assert_eq!(day_of_week_from_str("mon"), 0);
        assert_eq!(day_of_week_from_str("sat"), 5);
        assert_eq!(day_of_week_from_str("sun"), 6);
        assert_eq!(day_of_week_from_str("eff"), 7);
        assert_eq!(day_of_week_to_str(0), "mon");
        assert_eq!(day_of_week_to_str(7), "");
    }

    #[test]
    fn bitmask_collects_days() {
        assert_eq!(weekdays_bitmask("mon"), Some(0b000_0001));
        assert_eq!(weekdays_bitmask("fri,sat,sun"), Some(0b111_0000));
        assert_eq!(weekdays_bitmask("sat, sun, mon"), Some(0b110_0001));
        assert_eq!(weekdays_bitmask("fri,xyz"), None);
        assert_eq!(weekdays_bitmask(""), None);
    }
}
