use std::sync::Arc;

use anyhow::Result;
use dashmap::DashMap;

use crate::domain::models::KeyValueStore;

/// In-process store. Clones share the same entries.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        return Ok(self.entries.get(key).map(|value| value.to_string()));
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        return Ok(());
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        return Ok(());
    }
}
