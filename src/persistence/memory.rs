use super::{PersistenceResult, RecordStore};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Process-local key/value record store.
///
/// Clones share the same records, so a test can hand one clone to a
/// `BoardManager` and inspect writes through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.records.lock().insert(key.into(), value.into());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.records.lock().get(key).cloned()
    }
}

impl RecordStore for MemoryStore {
    fn read_record(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.get(key))
    }

    fn write_record(&self, key: &str, value: &str) -> PersistenceResult<()> {
        self.records.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
