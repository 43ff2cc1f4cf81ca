//! Location propagation hooks.
//!
//! [`LocationPropagator`] mirrors a transaction's header location onto its
//! lines while the user edits them and before the record is persisted, and
//! backfills location, customer and ship-to onto purchase orders created from
//! a requisition. Every hook is fail-open: faults are logged and the hook
//! returns its benign default.

pub mod config;
pub mod hook;
pub mod reconcile;

mod barrier;
mod line;
mod propagator;
mod submit;

pub use config::{ConfigError, PropagatorConfig};
pub use hook::{HookEvent, HookOutcome};
pub use propagator::LocationPropagator;
pub use reconcile::{Backfill, HeaderSnapshot, apply_backfill, plan_backfill};
