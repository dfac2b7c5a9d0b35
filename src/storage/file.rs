use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::{KeyValueStorage, KvValue};

/// File-backed key-value store.
///
/// The whole map lives in memory and every mutation rewrites the backing JSON
/// document: write `<file>.tmp`, then rename over the target, so a crash never
/// leaves a half-written file. If the flush fails the in-memory map is left as
/// it was, keeping memory and disk in agreement.
pub struct FileKvStorage {
    path: PathBuf,
    map: RwLock<BTreeMap<String, KvValue>>,
}

impl FileKvStorage {
    /// Open (or lazily create) the store at `path`. A missing file is an empty
    /// store; an unreadable or corrupt one is also treated as empty and will be
    /// overwritten by the next successful write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating storage directory {}", dir.display()))?;
            }
        }
        let map = load_map(&path);
        debug!(target: "gateguard::storage", "opened {} keys={}", path.display(), map.len());
        Ok(Self { path, map: RwLock::new(map) })
    }

    pub fn path(&self) -> &Path { &self.path }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn flush(&self, map: &BTreeMap<String, KvValue>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(map)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    /// Apply `f` to a copy of the map and commit it only if the flush succeeds.
    fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, KvValue>) -> bool,
    {
        let mut w = self.map.write();
        let mut next = w.clone();
        if !f(&mut next) {
            return Ok(());
        }
        self.flush(&next)?;
        *w = next;
        Ok(())
    }
}

fn load_map(path: &Path) -> BTreeMap<String, KvValue> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!(target: "gateguard::storage", "cannot read {}: {}; starting empty", path.display(), e);
            return BTreeMap::new();
        }
    };
    match serde_json::from_slice::<BTreeMap<String, KvValue>>(&bytes) {
        Ok(m) => m,
        Err(e) => {
            warn!(target: "gateguard::storage", "corrupt store {}: {}; starting empty", path.display(), e);
            BTreeMap::new()
        }
    }
}

impl KeyValueStorage for FileKvStorage {
    fn get(&self, key: &str) -> Result<Option<KvValue>> {
        Ok(self.map.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: KvValue) -> Result<()> {
        self.mutate(|m| {
            m.insert(key.to_string(), value);
            true
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.mutate(|m| m.remove(key).is_some())
    }

    /// Single flush for the whole batch: either every entry lands or none does.
    fn set_many(&self, entries: &[(&str, KvValue)]) -> Result<()> {
        self.mutate(|m| {
            for (k, v) in entries {
                m.insert(k.to_string(), v.clone());
            }
            !entries.is_empty()
        })
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        self.mutate(|m| {
            let mut changed = false;
            for k in keys {
                changed |= m.remove(*k).is_some();
            }
            changed
        })
    }
}
