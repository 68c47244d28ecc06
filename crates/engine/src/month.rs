//! Month keys (`YYYY-MM`) and ISO date helpers.
//!
//! A [`Month`] is the time bucket of the budget. Its ordering is chronological,
//! which is also the lexicographic ordering of the canonical string form
//! (`"2026-01" < "2026-02" < "2026-10"`).

use std::{fmt, str::FromStr};

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(0..=9999).contains(&year) {
            return Err(EngineError::InvalidMonth(format!(
                "year {year} out of range"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidMonth(format!(
                "month {month} out of range"
            )));
        }
        Ok(Self { year, month })
    }

    /// Parse a strict `YYYY-MM` key (zero padded).
    pub fn parse(value: &str) -> ResultEngine<Self> {
        let invalid = || EngineError::InvalidMonth(format!("expected YYYY-MM, got '{value}'"));
        let bytes = value.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let (year, month) = (&value[..4], &value[5..]);
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    pub fn of_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month of the local clock.
    pub fn current() -> Self {
        Self::of_date(Local::now().date_naive())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Shift by `delta` calendar months (negative goes back). Fails when
    /// the result leaves years `0..=9999`.
    pub fn add_months(self, delta: i32) -> ResultEngine<Self> {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(delta);
        let year = i32::try_from(index.div_euclid(12))
            .map_err(|_| EngineError::InvalidMonth(format!("{self} shifted by {delta} months")))?;
        Self::new(year, index.rem_euclid(12) as u32 + 1)
    }

    pub fn next(self) -> ResultEngine<Self> {
        self.add_months(1)
    }

    pub fn prev(self) -> ResultEngine<Self> {
        self.add_months(-1)
    }

    /// First calendar day of the month; `None` only outside chrono's range.
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of_date(date) == self
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Month {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// Month key of an ISO date string: its first seven characters.
pub fn month_of(date: &str) -> Option<Month> {
    date.get(..7).and_then(|prefix| Month::parse(prefix).ok())
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(format!("expected YYYY-MM-DD, got '{value}'")))
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(value: &str) -> Month {
        Month::parse(value).unwrap()
    }

    #[test]
    fn parses_and_displays_canonical_form() {
        let m = month("2026-02");
        assert_eq!(m.year(), 2026);
        assert_eq!(m.month(), 2);
        assert_eq!(m.to_string(), "2026-02");
    }

    #[test]
    fn rejects_malformed_keys() {
        for raw in ["2026-2", "2026/02", "26-02", "2026-13", "2026-00", "abcd-ef", "2026-02-01"] {
            assert!(
                matches!(Month::parse(raw), Err(EngineError::InvalidMonth(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn ordering_matches_string_ordering() {
        let keys = ["2026-01", "2026-02", "2026-10", "2027-01"];
        for pair in keys.windows(2) {
            assert!(month(pair[0]) < month(pair[1]));
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn add_months_crosses_year_boundaries() {
        assert_eq!(month("2026-12").add_months(1).unwrap(), month("2027-01"));
        assert_eq!(month("2026-01").add_months(-1).unwrap(), month("2025-12"));
        assert_eq!(month("2026-03").add_months(-15).unwrap(), month("2024-12"));
        assert_eq!(month("2026-03").add_months(0).unwrap(), month("2026-03"));
        assert_eq!(month("2026-05").next().unwrap().prev().unwrap(), month("2026-05"));
    }

    #[test]
    fn add_months_stays_within_four_digit_years() {
        assert!(matches!(month("9999-12").next(), Err(EngineError::InvalidMonth(_))));
        assert!(matches!(month("0000-01").prev(), Err(EngineError::InvalidMonth(_))));
        assert!(month("2026-01").add_months(i32::MAX).is_err());
        assert_eq!(month("0000-02").prev().unwrap(), month("0000-01"));
    }

    #[test]
    fn month_of_takes_the_date_prefix() {
        assert_eq!(month_of("2026-02-10"), Some(month("2026-02")));
        assert_eq!(month_of("2026"), None);
        assert_eq!(month_of(""), None);
    }

    #[test]
    fn contains_checks_the_date_month() {
        let date = parse_date("2026-02-28").unwrap();
        assert!(month("2026-02").contains(date));
        assert!(!month("2026-03").contains(date));
        assert_eq!(Month::of_date(date), month("2026-02"));
        assert_eq!(
            month("2026-02").first_day(),
            Some(parse_date("2026-02-01").unwrap())
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(matches!(parse_date("10/02/2026"), Err(EngineError::InvalidDate(_))));
        assert!(parse_date(" 2026-02-10 ").is_ok());
    }

    #[test]
    fn serde_uses_the_string_form() {
        let json = serde_json::to_string(&month("2026-07")).unwrap();
        assert_eq!(json, "\"2026-07\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month("2026-07"));
        assert!(serde_json::from_str::<Month>("\"2026-7\"").is_err());
    }
}
