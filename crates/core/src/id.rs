//! Strongly-typed record identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Internal id of a host record.
///
/// The host hands ids around as strings; internally they are numeric.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<RecordId> for u64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl FromStr for RecordId {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<u64>()
            .map_err(|e| RecordError::invalid_id(format!("RecordId '{s}': {e}")))?;
        Ok(Self(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_string_form() {
        let id: RecordId = " 1042 ".parse().unwrap();
        assert_eq!(id, RecordId::new(1042));
        assert_eq!(id.to_string(), "1042");
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = "PO-17".parse::<RecordId>().unwrap_err();
        assert!(matches!(err, RecordError::InvalidId(msg) if msg.contains("PO-17")));
    }
}
