//! Document version numbers.
//!
//! A version is a `major.minor` pair. Minor bumps record ordinary edits,
//! major bumps record restructurings; both derive strictly increasing
//! numbers. Versions are persisted as `"{major}.{minor}"` strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// How the next version number is derived when a document is edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionBump {
    /// Update the document's live fields without appending a snapshot.
    #[default]
    None,
    /// Increment the minor component.
    Minor,
    /// Increment the major component and reset minor to zero.
    Major,
}

impl VersionBump {
    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `major.minor` version identifier.
///
/// Ordering is lexicographic on `(major, minor)`, which the derived `Ord`
/// provides given the field order below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionNumber {
    pub major: u32,
    pub minor: u32,
}

impl VersionNumber {
    /// The version assigned to a document's first snapshot.
    pub const FIRST: VersionNumber = VersionNumber { major: 1, minor: 0 };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Derive the next version number.
    ///
    /// `VersionBump::None` never derives a number; callers route that case
    /// to the denormalized-fields-only update path before reaching here.
    pub fn next(self, bump: VersionBump) -> Result<VersionNumber, CoreError> {
        match bump {
            VersionBump::Minor => Ok(Self {
                major: self.major,
                minor: self.minor + 1,
            }),
            VersionBump::Major => Ok(Self {
                major: self.major + 1,
                minor: 0,
            }),
            VersionBump::None => Err(CoreError::Validation(
                "Version bump 'none' does not derive a new version number".into(),
            )),
        }
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for VersionNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let corrupt = || CoreError::Validation(format!("Malformed version number '{s}'"));
        let (major, minor) = s.split_once('.').ok_or_else(corrupt)?;
        Ok(Self {
            major: major.parse().map_err(|_| corrupt())?,
            minor: minor.parse().map_err(|_| corrupt())?,
        })
    }
}

impl Serialize for VersionNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- ordering ------------------------------------------------------------

    #[test]
    fn ordering_is_lexicographic_on_major_then_minor() {
        assert!(VersionNumber::new(1, 0) < VersionNumber::new(1, 1));
        assert!(VersionNumber::new(1, 1) < VersionNumber::new(2, 0));
        assert!(VersionNumber::new(2, 0) < VersionNumber::new(2, 1));
    }

    #[test]
    fn ordering_is_numeric_not_textual() {
        // "1.10" sorts after "1.9" even though the strings would not.
        assert!(VersionNumber::new(1, 9) < VersionNumber::new(1, 10));
    }

    // -- next ----------------------------------------------------------------

    #[test]
    fn minor_bump_increments_minor() {
        let next = VersionNumber::new(1, 3).next(VersionBump::Minor).unwrap();
        assert_eq!(next, VersionNumber::new(1, 4));
    }

    #[test]
    fn major_bump_resets_minor() {
        let next = VersionNumber::new(1, 3).next(VersionBump::Major).unwrap();
        assert_eq!(next, VersionNumber::new(2, 0));
    }

    #[test]
    fn none_bump_is_rejected() {
        assert!(VersionNumber::FIRST.next(VersionBump::None).is_err());
    }

    #[test]
    fn bumps_from_first_are_strictly_increasing() {
        let mut current = VersionNumber::FIRST;
        for bump in [
            VersionBump::Minor,
            VersionBump::Minor,
            VersionBump::Major,
            VersionBump::Minor,
        ] {
            let next = current.next(bump).unwrap();
            assert!(next > current, "{next} should exceed {current}");
            current = next;
        }
        assert_eq!(current, VersionNumber::new(2, 1));
    }

    // -- parse / display -----------------------------------------------------

    #[test]
    fn display_and_parse_roundtrip() {
        let v = VersionNumber::new(3, 12);
        assert_eq!(v.to_string(), "3.12");
        assert_eq!("3.12".parse::<VersionNumber>().unwrap(), v);
    }

    #[test]
    fn malformed_strings_fail_to_parse() {
        for raw in ["", "1", "1.", ".0", "1.0.0", "a.b", "1.-2"] {
            assert!(
                raw.parse::<VersionNumber>().is_err(),
                "'{raw}' should be rejected"
            );
        }
    }

    #[test]
    fn first_is_one_dot_zero() {
        assert_eq!(VersionNumber::FIRST.to_string(), "1.0");
    }

    // -- serde ---------------------------------------------------------------

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&VersionNumber::new(2, 1)).unwrap();
        assert_eq!(json, "\"2.1\"");
        let parsed: VersionNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, VersionNumber::new(2, 1));
    }

    #[test]
    fn bump_serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&VersionBump::Minor).unwrap(), "\"minor\"");
        let parsed: VersionBump = serde_json::from_str("\"major\"").unwrap();
        assert_eq!(parsed, VersionBump::Major);
    }
}
