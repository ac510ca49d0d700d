use std::collections::HashMap;
use std::sync::Mutex;

use super::db::DatabaseError;
use super::store::{KeyValueStore, Transaction};

/// In-process key/value namespace for development and testing.
/// Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Buffers writes until the closure succeeds; `None` marks a removal.
struct MemoryTransaction<'a> {
    base: &'a HashMap<String, String>,
    pending: HashMap<String, Option<String>>,
}

impl Transaction for MemoryTransaction<'_> {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        match self.pending.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => Ok(self.base.get(key).cloned()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.pending
            .insert(key.to_string(), Some(value.to_string()));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DatabaseError> {
        self.pending.insert(key.to_string(), None);
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let entries = self.entries.lock().map_err(|_| DatabaseError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(
        &self,
        op: &mut dyn FnMut(&mut dyn Transaction) -> Result<(), DatabaseError>,
    ) -> Result<(), DatabaseError> {
        let mut entries = self.entries.lock().map_err(|_| DatabaseError::Poisoned)?;

        let pending = {
            let mut txn = MemoryTransaction {
                base: &entries,
                pending: HashMap::new(),
            };
            op(&mut txn)?;
            txn.pending
        };

        for (key, value) in pending {
            match value {
                Some(value) => {
                    entries.insert(key, value);
                }
                None => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}
