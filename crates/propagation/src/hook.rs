//! Host lifecycle events as one discriminated union.

use copyloc_core::{FieldValue, UserEventType};
use copyloc_records::{RecordStore, SearchEngine};

use crate::propagator::LocationPropagator;

/// A host-triggered hook invocation with its context.
#[derive(Debug)]
pub enum HookEvent<'a, R> {
    /// A body field (`sublist == None`) or a current-line field changed.
    FieldChanged {
        record: &'a mut R,
        sublist: Option<&'a str>,
        field: &'a str,
    },
    /// The header location was set to `location` by the caller.
    HeaderLocationSet {
        record: &'a mut R,
        location: FieldValue,
    },
    LineInit {
        record: &'a mut R,
        sublist: &'a str,
    },
    LineCommit {
        record: &'a mut R,
        sublist: &'a str,
    },
    BeforeSubmit {
        record: &'a mut R,
        event: UserEventType,
    },
    AfterSubmit {
        record: &'a R,
        event: UserEventType,
    },
}

impl<R> HookEvent<'_, R> {
    pub fn kind(&self) -> &'static str {
        match self {
            HookEvent::FieldChanged { .. } => "field_changed",
            HookEvent::HeaderLocationSet { .. } => "header_location_set",
            HookEvent::LineInit { .. } => "line_init",
            HookEvent::LineCommit { .. } => "line_commit",
            HookEvent::BeforeSubmit { .. } => "before_submit",
            HookEvent::AfterSubmit { .. } => "after_submit",
        }
    }
}

/// What the host should do after a hook ran.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Line validators: whether the line may be committed.
    LineValid(bool),
    Done,
}

impl<S, E> LocationPropagator<S, E>
where
    S: RecordStore,
    E: SearchEngine,
{
    /// Route a host event to its hook.
    pub fn dispatch(&self, event: HookEvent<'_, S::Record>) -> HookOutcome {
        tracing::trace!(kind = event.kind(), "dispatching hook");
        match event {
            HookEvent::FieldChanged {
                record,
                sublist,
                field,
            } => self.on_field_changed(record, sublist, field),
            HookEvent::HeaderLocationSet { record, location } => {
                self.on_header_location_set(record, location)
            }
            HookEvent::LineInit { record, sublist } => self.on_line_init(record, sublist),
            HookEvent::LineCommit { record, sublist } => {
                return HookOutcome::LineValid(self.on_line_commit(record, sublist));
            }
            HookEvent::BeforeSubmit { record, event } => self.before_header_submit(record, event),
            HookEvent::AfterSubmit { record, event } => self.after_header_submit(record, event),
        }
        HookOutcome::Done
    }
}
