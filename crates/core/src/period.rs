use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Portuguese month abbreviations as they appear on statements, January first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Maps a Portuguese month abbreviation (any case) to its number, 1-based.
pub fn month_from_abbreviation(abbr: &str) -> Option<u32> {
    let abbr = abbr.to_lowercase();
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| *m == abbr)
        .map(|i| i as u32 + 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodParseError {
    #[error("Invalid period key '{0}': expected YYYY-MM")]
    Format(String),
    #[error("Month out of range in period key '{0}'")]
    Month(String),
}

/// Canonical `YYYY-MM` identifier of a statement month.
///
/// Ordering is chronological, so sorting by `PeriodKey` is the same as sorting
/// the textual keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

impl PeriodKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(PeriodKey { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        PeriodKey { year: date.year(), month: date.month() }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Human label in the statement's own style, e.g. `mar/2025`.
    pub fn label(self) -> String {
        format!("{}/{}", MONTH_ABBREVIATIONS[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for PeriodKey {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| PeriodParseError::Format(s.to_string()))?;
        let year: i32 = y.parse().map_err(|_| PeriodParseError::Format(s.to_string()))?;
        let month: u32 = m.parse().map_err(|_| PeriodParseError::Format(s.to_string()))?;
        PeriodKey::new(year, month).ok_or_else(|| PeriodParseError::Month(s.to_string()))
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
