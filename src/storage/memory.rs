use std::collections::HashMap;

use anyhow::Result;
use parking_lot::RwLock;

use super::{KeyValueStorage, KvValue};

/// Process-local store; nothing survives a restart. Used by tests and by
/// callers that deliberately want an ephemeral session.
#[derive(Default)]
pub struct MemoryKvStorage {
    map: RwLock<HashMap<String, KvValue>>,
}

impl MemoryKvStorage {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.map.read().len() }

    pub fn is_empty(&self) -> bool { self.map.read().is_empty() }
}

impl KeyValueStorage for MemoryKvStorage {
    fn get(&self, key: &str) -> Result<Option<KvValue>> {
        Ok(self.map.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: KvValue) -> Result<()> {
        self.map.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.map.write().remove(key);
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, KvValue)]) -> Result<()> {
        let mut w = self.map.write();
        for (k, v) in entries {
            w.insert(k.to_string(), v.clone());
        }
        Ok(())
    }
}
