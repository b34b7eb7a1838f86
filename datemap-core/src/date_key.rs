//! Calendar-day keys.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const FORMAT: &str = "%Y-%m-%d";

/// The local calendar day an instant falls on, written as `YYYY-MM-DD`.
///
/// Every place that groups events by day (the store, the overlap filter,
/// search grouping, export) derives its key through [`DateKey::of`], so two
/// events that can overlap always share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Key of the day containing `instant` (wall-clock, no timezone).
    pub fn of(instant: &NaiveDateTime) -> Self {
        DateKey(instant.date())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        DateKey(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), FORMAT)
            .map(DateKey)
            .map_err(|_| ValidationError::InvalidDate(s.to_string()))
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey(date)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_the_day_of_the_instant() {
        let late = NaiveDate::from_ymd_opt(2024, 12, 10)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(DateKey::of(&late).to_string(), "2024-12-10");
    }

    #[test]
    fn parses_iso_dates() {
        let key: DateKey = "2024-03-05".parse().unwrap();
        assert_eq!((key.year(), key.month(), key.day()), (2024, 3, 5));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            "next tuesday".parse::<DateKey>(),
            Err(ValidationError::InvalidDate("next tuesday".to_string()))
        );
    }

    #[test]
    fn orders_chronologically() {
        let a: DateKey = "2024-09-30".parse().unwrap();
        let b: DateKey = "2024-10-01".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn serializes_as_plain_string() {
        let key: DateKey = "2025-01-02".parse().unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2025-01-02\"");
        let back: DateKey = serde_json::from_str("\"2025-01-02\"").unwrap();
        assert_eq!(back, key);
    }
}
