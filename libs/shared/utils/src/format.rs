//! Display formatting for times and dates in user-facing messages.

use chrono::{NaiveDate, NaiveTime, Timelike};

/// `NaiveTime` -> `"8:00 AM"` / `"11:00 PM"`, the way the booking page
/// presents slot times.
pub fn format_time_12h(time: NaiveTime) -> String {
    let hour = time.hour();
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, time.minute(), period)
}

/// `NaiveDate` -> `"Monday, March 10, 2025"` for confirmation messages.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_morning_noon_and_midnight() {
        assert_eq!(format_time_12h(NaiveTime::from_hms_opt(8, 0, 0).unwrap()), "8:00 AM");
        assert_eq!(format_time_12h(NaiveTime::from_hms_opt(12, 0, 0).unwrap()), "12:00 PM");
        assert_eq!(format_time_12h(NaiveTime::from_hms_opt(0, 0, 0).unwrap()), "12:00 AM");
        assert_eq!(format_time_12h(NaiveTime::from_hms_opt(20, 0, 0).unwrap()), "8:00 PM");
    }

    #[test]
    fn formats_long_dates() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(format_display_date(date), "Monday, March 10, 2025");
    }
}
