//! Core domain types

use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user's guess of their weight on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightGuess {
    pub date: NaiveDate,
    pub weight: f64,
}

impl WeightGuess {
    pub fn new(date: NaiveDate, weight: f64) -> Self {
        Self { date, weight }
    }
}

/// Username and password pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which backend currently holds authoritative state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Remote,
    Memory,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Remote => write!(f, "remote"),
            StorageType::Memory => write!(f, "memory"),
        }
    }
}

/// Storage connection report, served by the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStatus {
    pub storage_type: StorageType,
    pub remote_connected: bool,
    pub memory_entries: usize,
}

/// Chart families rendered by the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Weight,
    Calories,
    Both,
    Insta,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Weight,
        ChartKind::Calories,
        ChartKind::Both,
        ChartKind::Insta,
    ];

    /// Directory and file name prefix of the chart images.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Weight => "weight",
            ChartKind::Calories => "calories",
            ChartKind::Both => "both",
            ChartKind::Insta => "insta",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Weight => "Weight",
            ChartKind::Calories => "Calories",
            ChartKind::Both => "Weight & Calories",
            ChartKind::Insta => "Insta",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Month filter selected on a chart page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthSelection {
    /// Whole year, or all data when no year is given
    All,
    /// Rolling 30-day window
    Last30,
    Month(Month),
    /// Anything else the query string carried
    Unknown,
}

impl MonthSelection {
    pub const LAST_30: &'static str = "last_30";

    /// Parse the `month` query parameter. English month names and their
    /// three-letter abbreviations are accepted in any case.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => MonthSelection::All,
            Some(Self::LAST_30) => MonthSelection::Last30,
            Some(name) => name
                .parse::<Month>()
                .map(MonthSelection::Month)
                .unwrap_or(MonthSelection::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_selection_parse() {
        assert_eq!(MonthSelection::parse(None), MonthSelection::All);
        assert_eq!(MonthSelection::parse(Some("  ")), MonthSelection::All);
        assert_eq!(MonthSelection::parse(Some("last_30")), MonthSelection::Last30);
        assert_eq!(
            MonthSelection::parse(Some("September")),
            MonthSelection::Month(Month::September)
        );
        assert_eq!(
            MonthSelection::parse(Some("jul")),
            MonthSelection::Month(Month::July)
        );
        assert_eq!(MonthSelection::parse(Some("Smarch")), MonthSelection::Unknown);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_storage_status_serializes_lowercase() {
        let status = StorageStatus {
            storage_type: StorageType::Memory,
            remote_connected: false,
            memory_entries: 1,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["storage_type"], "memory");
        assert_eq!(json["memory_entries"], 1);
    }
}
