//! Version tokens that order migrations.
//!
//! A [`Version`] is an opaque, totally ordered token. Tokens compare
//! lexicographically, so the conventional date-stamped identifiers
//! (`2024_05_01_add_priority`) sort in chronological order without any
//! date parsing. The derived [`Ord`] is the single comparator used by the
//! registry's ordered storage and by every version check in the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MigrationError, MigrationResult};

/// An opaque, totally ordered migration version token.
///
/// A token must be non-blank; [`Version::new`] rejects empty or
/// whitespace-only input with [`MigrationError::Configuration`], so a
/// migration unit can never be constructed without a usable version.
///
/// # Examples
///
/// ```
/// use caravan::Version;
///
/// let v1 = Version::new("2024_05_01_add_priority").unwrap();
/// let v2 = Version::new("2024_06_10_rename_inbox").unwrap();
/// assert!(v1 < v2);
/// assert!(Version::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version(String);

impl Version {
    /// Creates a version from a token.
    ///
    /// Fails with [`MigrationError::Configuration`] when the token is empty
    /// or whitespace-only.
    pub fn new(token: impl Into<String>) -> MigrationResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(MigrationError::Configuration(
                "migration version token must not be empty".to_string(),
            ));
        }
        Ok(Self(token))
    }

    /// Builds a token in the `YYYY_MM_DD_label` naming convention.
    ///
    /// The zero-padded date prefix keeps lexicographic and chronological
    /// order in agreement. An empty label yields a bare date token.
    pub fn dated(date: chrono::NaiveDate, label: &str) -> MigrationResult<Self> {
        let prefix = date.format("%Y_%m_%d");
        if label.is_empty() {
            Self::new(prefix.to_string())
        } else {
            Self::new(format!("{prefix}_{label}"))
        }
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Version {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// Deserialization runs through the same validation as `Version::new`, so a
// blank token cannot enter through a persisted marker either.
impl TryFrom<String> for Version {
    type Error = MigrationError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Self::new(token)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_token() {
        let v = Version::new("2024_05_01_add_priority").unwrap();
        assert_eq!(v.as_str(), "2024_05_01_add_priority");
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(Version::new("").is_err());
    }

    #[test]
    fn test_new_rejects_blank() {
        let err = Version::new("  \t ").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let v1 = Version::new("2024_05_01").unwrap();
        let v2 = Version::new("2024_06_10").unwrap();
        let v3 = Version::new("2024_06_10").unwrap();
        assert!(v1 < v2);
        assert!(v2 > v1);
        assert_eq!(v2, v3);
        assert!(v2 <= v3);
    }

    #[test]
    fn test_date_stamped_tokens_sort_chronologically() {
        let earlier = Version::new("2023_12_31_cleanup").unwrap();
        let later = Version::new("2024_01_01_kickoff").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_dated() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let v = Version::dated(date, "add_priority").unwrap();
        assert_eq!(v.as_str(), "2024_05_01_add_priority");
    }

    #[test]
    fn test_dated_empty_label() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let v = Version::dated(date, "").unwrap();
        assert_eq!(v.as_str(), "2024_05_01");
    }

    #[test]
    fn test_dated_pads_month_and_day() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        let v = Version::dated(date, "x").unwrap();
        assert_eq!(v.as_str(), "2024_01_09_x");
    }

    #[test]
    fn test_from_str() {
        let v: Version = "2024_05_01".parse().unwrap();
        assert_eq!(v.as_str(), "2024_05_01");
        assert!("".parse::<Version>().is_err());
    }

    #[test]
    fn test_display() {
        let v = Version::new("2024_05_01").unwrap();
        assert_eq!(v.to_string(), "2024_05_01");
    }

    #[test]
    fn test_serde_round_trip_as_plain_string() {
        let v = Version::new("2024_05_01").unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"2024_05_01\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_deserialize_rejects_blank_token() {
        assert!(serde_json::from_str::<Version>("\"\"").is_err());
        assert!(serde_json::from_str::<Version>("\"  \"").is_err());
    }
}
