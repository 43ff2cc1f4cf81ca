use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use copyloc_core::{RecordError, RecordId, RecordResult, RecordType};

use crate::record::{Record, TransactionRecord};

/// Options passed to the host on save.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveOptions {
    /// Let the host source dependent field values (e.g. address from ship-to).
    pub enable_sourcing: bool,
    /// Persist even when mandatory body fields are empty.
    pub ignore_mandatory_fields: bool,
}

/// Loads and persists host records.
///
/// Implementations must:
/// - return a fresh copy on `load` (no current-line buffer, no shared state)
/// - assign an id when saving a record that has none
/// - reject saves with empty mandatory fields unless `ignore_mandatory_fields`
pub trait RecordStore: Send + Sync {
    type Record: Record;

    fn load(&self, record_type: &RecordType, id: RecordId) -> RecordResult<Self::Record>;

    /// Persist the record and return its id.
    fn save(&self, record: &Self::Record, options: SaveOptions) -> RecordResult<RecordId>;
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    type Record = S::Record;

    fn load(&self, record_type: &RecordType, id: RecordId) -> RecordResult<Self::Record> {
        (**self).load(record_type, id)
    }

    fn save(&self, record: &Self::Record, options: SaveOptions) -> RecordResult<RecordId> {
        (**self).save(record, options)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RecordKey {
    record_type: RecordType,
    id: RecordId,
}

/// One entry of the save journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEntry {
    pub record_type: RecordType,
    pub id: RecordId,
    pub options: SaveOptions,
}

/// In-memory record store.
///
/// Intended for tests/dev. Sourcing is not simulated; the requested options are
/// only recorded in the save journal.
#[derive(Debug)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<RecordKey, TransactionRecord>>,
    mandatory: HashMap<RecordType, Vec<String>>,
    journal: RwLock<Vec<SaveEntry>>,
    next_id: AtomicU64,
    fail_saves: AtomicBool,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            mandatory: HashMap::new(),
            journal: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            fail_saves: AtomicBool::new(false),
        }
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare body fields that must be non-empty on save.
    pub fn with_mandatory(mut self, record_type: RecordType, fields: &[&str]) -> Self {
        self.mandatory
            .insert(record_type, fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Seed a record without journaling a save. Returns its id.
    pub fn insert(&self, mut record: TransactionRecord) -> RecordResult<RecordId> {
        let id = match record.id() {
            Some(id) => id,
            None => self.allocate_id(),
        };
        record.set_id(id);
        record.cancel_line();
        self.write_record(record, id)?;
        Ok(id)
    }

    /// Current persisted state of a record, if any.
    pub fn get(&self, record_type: &RecordType, id: RecordId) -> Option<TransactionRecord> {
        let key = RecordKey {
            record_type: record_type.clone(),
            id,
        };
        self.records.read().ok()?.get(&key).cloned()
    }

    /// Every save made so far, in order.
    pub fn saves(&self) -> Vec<SaveEntry> {
        self.journal.read().map(|j| j.clone()).unwrap_or_default()
    }

    /// Make subsequent saves fail (fault injection).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn allocate_id(&self) -> RecordId {
        RecordId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn write_record(&self, record: TransactionRecord, id: RecordId) -> RecordResult<()> {
        let key = RecordKey {
            record_type: record.record_type().clone(),
            id,
        };
        let mut records = self
            .records
            .write()
            .map_err(|_| RecordError::save("lock poisoned"))?;
        // Keep generated ids ahead of seeded ones.
        self.next_id.fetch_max(id.get() + 1, Ordering::SeqCst);
        records.insert(key, record);
        Ok(())
    }

    fn check_mandatory(&self, record: &TransactionRecord) -> RecordResult<()> {
        let Some(fields) = self.mandatory.get(record.record_type()) else {
            return Ok(());
        };
        match fields.iter().find(|f| record.get_value(f).is_empty()) {
            Some(field) => Err(RecordError::MandatoryFieldMissing(field.clone())),
            None => Ok(()),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    type Record = TransactionRecord;

    fn load(&self, record_type: &RecordType, id: RecordId) -> RecordResult<TransactionRecord> {
        self.get(record_type, id)
            .ok_or_else(|| RecordError::not_found(record_type.clone(), id))
    }

    fn save(&self, record: &TransactionRecord, options: SaveOptions) -> RecordResult<RecordId> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RecordError::save("record store unavailable"));
        }
        if !options.ignore_mandatory_fields {
            self.check_mandatory(record)?;
        }

        let id = match record.id() {
            Some(id) => id,
            None => self.allocate_id(),
        };
        let mut stored = record.clone();
        stored.set_id(id);
        stored.cancel_line();
        self.write_record(stored, id)?;

        self.journal
            .write()
            .map_err(|_| RecordError::save("lock poisoned"))?
            .push(SaveEntry {
                record_type: record.record_type().clone(),
                id,
                options,
            });
        Ok(id)
    }
}
