//!
//! gateguard storage module
//! ------------------------
//! The only persistence capability the session core needs is a string-keyed
//! key-value store that survives process restarts. This module defines that
//! capability (`KeyValueStorage`), two backends, and the `CredentialStore`
//! that owns the session keys on top of it.
//!
//! Persisted layout (see `keys`):
//! - `auth_token`    opaque session token
//! - `user_data`     JSON-serialised `UserProfile`
//! - `refresh_token` reserved, cleared on logout but otherwise untouched
//! - `app_language`  / `theme_mode` belong to the UI and are never touched here

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod file;
mod memory;
pub mod credentials;

pub use credentials::{CredentialStore, CredentialWriter, StoredSession};
pub use file::FileKvStorage;
pub use memory::MemoryKvStorage;

/// Well-known keys in the host key-value store.
pub mod keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const USER_DATA: &str = "user_data";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const APP_LANGUAGE: &str = "app_language";
    pub const THEME_MODE: &str = "theme_mode";
}

/// Value variants a key may hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KvValue {
    Int(i64),
    Str(String),
}

impl KvValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            KvValue::Str(s) => Some(s.as_str()),
            KvValue::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            KvValue::Int(i) => Some(*i),
            KvValue::Str(_) => None,
        }
    }
}

impl From<String> for KvValue {
    fn from(s: String) -> Self { KvValue::Str(s) }
}

impl From<&str> for KvValue {
    fn from(s: &str) -> Self { KvValue::Str(s.to_string()) }
}

impl From<i64> for KvValue {
    fn from(i: i64) -> Self { KvValue::Int(i) }
}

/// Persistent get/set/remove by key. Implementations are blocking; async callers
/// go through `CredentialStore`, which moves the calls onto the blocking pool.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<KvValue>>;

    fn set(&self, key: &str, value: KvValue) -> Result<()>;

    /// Remove a key. Removing an absent key is a successful no-op.
    fn remove(&self, key: &str) -> Result<()>;

    /// Write several keys. Backends that can commit them in one write should
    /// override this; the default is sequential and stops at the first error.
    fn set_many(&self, entries: &[(&str, KvValue)]) -> Result<()> {
        for (k, v) in entries {
            self.set(k, v.clone())?;
        }
        Ok(())
    }

    /// Remove several keys; same contract as `set_many`.
    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        for k in keys {
            self.remove(k)?;
        }
        Ok(())
    }
}
