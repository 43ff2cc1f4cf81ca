//! Fault barrier and re-entrancy guard shared by every hook.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use copyloc_core::RecordId;

/// Run a hook body; on error, log it under `label` and return `fallback`.
pub(crate) fn guarded<T>(
    label: &'static str,
    fallback: T,
    body: impl FnOnce() -> anyhow::Result<T>,
) -> T {
    match body() {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(hook = label, error = %format!("{err:#}"), "hook failed");
            fallback
        }
    }
}

/// Record ids whose after-submit is currently running.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    ids: Mutex<HashSet<RecordId>>,
}

impl InFlight {
    /// Claim `id`; `None` if it is already claimed.
    pub(crate) fn enter(&self, id: RecordId) -> Option<InFlightToken<'_>> {
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        ids.insert(id).then_some(InFlightToken { owner: self, id })
    }

    #[cfg(test)]
    fn contains(&self, id: RecordId) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }
}

/// Releases the claim on drop.
#[derive(Debug)]
pub(crate) struct InFlightToken<'a> {
    owner: &'a InFlight,
    id: RecordId,
}

impl Drop for InFlightToken<'_> {
    fn drop(&mut self) {
        self.owner
            .ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
