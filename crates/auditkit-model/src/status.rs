//! Checkpoint status
//!
//! Stored documents carry status as free-form strings written by several
//! generations of the data-entry UI, so parsing is case-insensitive and an
//! absent, empty, or unrecognized value reads as [`CheckpointStatus::Pending`].

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Inspection outcome for a single checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckpointStatus {
    /// Checkpoint passed inspection
    Pass,
    /// Checkpoint failed inspection
    Fail,
    /// Checkpoint passed with a caveat
    Warning,
    /// Not yet inspected
    #[default]
    Pending,
}

impl CheckpointStatus {
    /// Canonical lowercase form (the on-disk representation).
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckpointStatus::Pass => "pass",
            CheckpointStatus::Fail => "fail",
            CheckpointStatus::Warning => "warning",
            CheckpointStatus::Pending => "pending",
        }
    }

    /// Parse a stored status value.
    ///
    /// Case-insensitive; leading/trailing whitespace ignored. Anything that
    /// is not a recognized status (including `""`) is `Pending`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pass" => CheckpointStatus::Pass,
            "fail" => CheckpointStatus::Fail,
            "warning" => CheckpointStatus::Warning,
            _ => CheckpointStatus::Pending,
        }
    }

    /// Whether the checkpoint has been inspected.
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, CheckpointStatus::Pending)
    }
}

impl std::fmt::Display for CheckpointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CheckpointStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CheckpointStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Legacy rows store `null` for untouched checkpoints.
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(CheckpointStatus::Pending, Self::parse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(CheckpointStatus::parse("Pass"), CheckpointStatus::Pass);
        assert_eq!(CheckpointStatus::parse("FAIL"), CheckpointStatus::Fail);
        assert_eq!(CheckpointStatus::parse(" warning "), CheckpointStatus::Warning);
    }

    #[test]
    fn empty_and_unknown_default_to_pending() {
        assert_eq!(CheckpointStatus::parse(""), CheckpointStatus::Pending);
        assert_eq!(CheckpointStatus::parse("n/a"), CheckpointStatus::Pending);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&CheckpointStatus::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }

    #[test]
    fn deserializes_null_as_pending() {
        let status: CheckpointStatus = serde_json::from_str("null").unwrap();
        assert_eq!(status, CheckpointStatus::Pending);
    }

    #[test]
    fn deserializes_capitalized() {
        let status: CheckpointStatus = serde_json::from_str("\"Pass\"").unwrap();
        assert_eq!(status, CheckpointStatus::Pass);
    }
}
