//! Field values as read from and written to a record.

use serde::{Deserialize, Serialize};

/// A body or line field value.
///
/// Select fields (location, customer, address) hold the referenced record's
/// internal id; free-form fields hold text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Empty,
    Id(u64),
    Text(String),
}

impl FieldValue {
    /// True for an unset field or an empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Id(_) => false,
            FieldValue::Text(s) => s.is_empty(),
        }
    }

    pub fn as_id(&self) -> Option<u64> {
        match self {
            FieldValue::Id(id) => Some(*id),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Empty => None,
        }
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Id(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Option<u64>> for FieldValue {
    fn from(value: Option<u64>) -> Self {
        value.map(FieldValue::Id).unwrap_or_default()
    }
}

impl core::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldValue::Empty => Ok(()),
            FieldValue::Id(id) => write!(f, "{id}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}
