//! Host record adapter boundary.
//!
//! The propagation rules never talk to the host directly. They read and write
//! through the traits defined here:
//!
//! - [`Record`]: field, sublist and current-line access on one record
//! - [`RecordStore`]: loading and saving records
//! - [`SearchEngine`]: the requisition-link query
//!
//! In-memory implementations are provided for tests and local tooling.

pub mod record;
pub mod search;
pub mod store;

pub use record::{Line, Record, TransactionRecord};
pub use search::{InMemorySearchEngine, RequisitionLink, RequisitionQuery, SearchEngine};
pub use store::{InMemoryRecordStore, RecordStore, SaveEntry, SaveOptions};
