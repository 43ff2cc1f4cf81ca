//! Record access error model.

use thiserror::Error;

use crate::id::RecordId;
use crate::kind::RecordType;

/// Result type used across the record adapter boundary.
pub type RecordResult<T> = Result<T, RecordError>;

/// Error raised by a record, record store or search adapter.
///
/// These are host-facing failures. The propagation hooks never surface them to
/// the caller; they are logged and swallowed at the hook boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// No record of the given type exists under the id.
    #[error("{record_type} {id} not found")]
    NotFound { record_type: RecordType, id: RecordId },

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The record has no sublist under this key.
    #[error("unknown sublist '{0}'")]
    UnknownSublist(String),

    /// A sublist line index past the end of the sublist.
    #[error("line {line} out of range for sublist '{sublist}' ({count} lines)")]
    LineOutOfRange {
        sublist: String,
        line: usize,
        count: usize,
    },

    /// A current-line operation was attempted with no line selected.
    #[error("no current line selected on sublist '{0}'")]
    NoCurrentLine(String),

    /// Save rejected because a mandatory body field is empty.
    #[error("mandatory field '{0}' is empty")]
    MandatoryFieldMissing(String),

    /// Persisting the record failed.
    #[error("save failed: {0}")]
    Save(String),

    /// Running a search failed.
    #[error("search failed: {0}")]
    Search(String),
}

impl RecordError {
    pub fn not_found(record_type: RecordType, id: RecordId) -> Self {
        Self::NotFound { record_type, id }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn save(msg: impl Into<String>) -> Self {
        Self::Save(msg.into())
    }

    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }
}
