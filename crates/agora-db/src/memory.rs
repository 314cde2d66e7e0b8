//! In-memory store, used by tests and when no data directory is configured.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::DbError;
use crate::store::{StateStore, validate_key};

/// A [`StateStore`] backed by a `HashMap`. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl StateStore for MemoryStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, DbError> {
        validate_key(key)?;
        Ok(self.entries.read().get(key).cloned())
    }

    fn save_raw(&self, key: &str, json: &str) -> Result<(), DbError> {
        validate_key(key)?;
        self.entries.write().insert(key.to_owned(), json.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), DbError> {
        validate_key(key)?;
        self.entries.write().remove(key);
        Ok(())
    }
}
