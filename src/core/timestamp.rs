//! Timestamp formatting utilities
//!
//! Four layouts are available, picked by two independent toggles: whether
//! the date is shown and whether milliseconds are shown.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp layout of a rendered line
///
/// # Examples
///
/// ```
/// use rust_rotating_logger::core::TimestampFormat;
///
/// assert_eq!(TimestampFormat::from_toggles(true, true), TimestampFormat::DateTimeMillis);
/// assert_eq!(TimestampFormat::from_toggles(false, false), TimestampFormat::Time);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08 10:30:45.123`
    #[default]
    DateTimeMillis,

    /// `2025-01-08 10:30:45`
    DateTime,

    /// `10:30:45.123`
    TimeMillis,

    /// `10:30:45`
    Time,
}

impl TimestampFormat {
    #[must_use]
    pub fn from_toggles(show_date: bool, show_millis: bool) -> Self {
        match (show_date, show_millis) {
            (true, true) => TimestampFormat::DateTimeMillis,
            (true, false) => TimestampFormat::DateTime,
            (false, true) => TimestampFormat::TimeMillis,
            (false, false) => TimestampFormat::Time,
        }
    }

    /// strftime pattern for this layout
    #[must_use]
    pub fn pattern(&self) -> &'static str {
        match self {
            TimestampFormat::DateTimeMillis => "%Y-%m-%d %H:%M:%S%.3f",
            TimestampFormat::DateTime => "%Y-%m-%d %H:%M:%S",
            TimestampFormat::TimeMillis => "%H:%M:%S%.3f",
            TimestampFormat::Time => "%H:%M:%S",
        }
    }

    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        datetime.format(self.pattern()).to_string()
    }

    #[must_use]
    pub fn shows_date(&self) -> bool {
        matches!(self, TimestampFormat::DateTimeMillis | TimestampFormat::DateTime)
    }

    #[must_use]
    pub fn shows_millis(&self) -> bool {
        matches!(self, TimestampFormat::DateTimeMillis | TimestampFormat::TimeMillis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_all_layouts() {
        let dt = fixed_datetime();
        assert_eq!(TimestampFormat::DateTimeMillis.format(&dt), "2025-01-08 10:30:45.123");
        assert_eq!(TimestampFormat::DateTime.format(&dt), "2025-01-08 10:30:45");
        assert_eq!(TimestampFormat::TimeMillis.format(&dt), "10:30:45.123");
        assert_eq!(TimestampFormat::Time.format(&dt), "10:30:45");
    }

    #[test]
    fn test_toggles_round_trip() {
        for date in [true, false] {
            for millis in [true, false] {
                let format = TimestampFormat::from_toggles(date, millis);
                assert_eq!(format.shows_date(), date);
                assert_eq!(format.shows_millis(), millis);
            }
        }
    }

    #[test]
    fn test_default_is_date_time_millis() {
        assert_eq!(TimestampFormat::default(), TimestampFormat::DateTimeMillis);
    }

    #[test]
    fn test_millis_are_zero_padded() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).single().expect("valid datetime")
            + chrono::Duration::milliseconds(9);
        assert_eq!(TimestampFormat::DateTimeMillis.format(&dt), "2025-03-04 05:06:07.009");
    }
}
