//! Day keys
//!
//! The one place a calendar day is derived from an instant. Both the
//! store's partition key and "today" filtering go through `DayKey::of`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

const FORMAT: &str = "%Y-%m-%d";

/// A local calendar day, rendered as an ISO date ("2025-01-09")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// The calendar day of `instant` in its own time zone
    pub fn of<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        DayKey(instant.date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        DayKey(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn previous(&self) -> Option<Self> {
        self.0.checked_sub_days(Days::new(1)).map(DayKey)
    }

    pub fn next(&self) -> Option<Self> {
        self.0.checked_add_days(Days::new(1)).map(DayKey)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), FORMAT).map(DayKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_day_of_local_instant() {
        // 23:30 in New York is already the next day in UTC
        let ts = DateTime::parse_from_rfc3339("2025-01-09T23:30:00-05:00").unwrap();
        assert_eq!(DayKey::of(&ts).to_string(), "2025-01-09");
        assert_eq!(DayKey::of(&ts.with_timezone(&Utc)).to_string(), "2025-01-10");
    }

    #[test]
    fn test_midnight_boundary() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let before = tz.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap();
        let after = tz.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        assert_ne!(DayKey::of(&before), DayKey::of(&after));
        assert_eq!(DayKey::of(&before).next(), Some(DayKey::of(&after)));
        assert_eq!(DayKey::of(&after).previous(), Some(DayKey::of(&before)));
    }

    #[test]
    fn test_parse_and_display() {
        let key: DayKey = "2024-02-29".parse().unwrap();
        assert_eq!(key.to_string(), "2024-02-29");
        assert!("2023-02-29".parse::<DayKey>().is_err());
        assert!("Thu Jan 09 2025".parse::<DayKey>().is_err());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let key: DayKey = "2025-01-09".parse().unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2025-01-09\"");
    }
}
