//! `copyloc-core` — shared primitives for location propagation.
//!
//! This crate contains **pure** building blocks (no host access, no logging):
//! identifiers, field values, record/event type tags and the fixed field keys
//! the host platform expects.

pub mod error;
pub mod fields;
pub mod id;
pub mod kind;
pub mod value;

pub use error::{RecordError, RecordResult};
pub use id::RecordId;
pub use kind::{RecordType, UserEventType};
pub use value::FieldValue;
