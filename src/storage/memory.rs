//! In-process storage backend.

use super::{StorageBackend, StorageError};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument};

/// Storage that keeps records in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryStorage {
    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn save(&self, kind: &str, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StorageError::new("Memory storage lock poisoned"))?;
        records.insert((kind.to_string(), key.to_string()), value.to_vec());
        debug!("Record stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn load(&self, kind: &str, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let records = self
            .records
            .lock()
            .map_err(|_| StorageError::new("Memory storage lock poisoned"))?;
        Ok(records.get(&(kind.to_string(), key.to_string())).cloned())
    }
}
