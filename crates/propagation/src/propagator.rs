use copyloc_records::{RecordStore, SearchEngine};

use crate::barrier::InFlight;
use crate::config::PropagatorConfig;

/// Header → line location propagation and requisition backfill.
///
/// Line-level hooks (`on_*`) work on any [`copyloc_records::Record`] and need
/// neither adapter; the submit hooks reload and resave through `store` and
/// query requisitions through `search`.
#[derive(Debug)]
pub struct LocationPropagator<S, E> {
    pub(crate) store: S,
    pub(crate) search: E,
    pub(crate) config: PropagatorConfig,
    pub(crate) in_flight: InFlight,
}

impl<S, E> LocationPropagator<S, E>
where
    S: RecordStore,
    E: SearchEngine,
{
    pub fn new(store: S, search: E) -> Self {
        Self::with_config(store, search, PropagatorConfig::default())
    }

    pub fn with_config(store: S, search: E, config: PropagatorConfig) -> Self {
        Self {
            store,
            search,
            config,
            in_flight: InFlight::default(),
        }
    }

    pub fn config(&self) -> &PropagatorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn search(&self) -> &E {
        &self.search
    }
}
