//! Session persistence boundary: the only code allowed to read or write the
//! `auth_token` / `user_data` keys.
//!
//! Every write goes through one `tokio::sync::Mutex`, so a `save_session` from a
//! login and a `clear_session` from a logout are strictly ordered. Callers that
//! need to make a decision and write under the same lock (the session resolver's
//! stale-attempt check) take a `CredentialWriter` explicitly.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use super::{keys, KeyValueStorage, KvValue};
use crate::identity::UserProfile;

/// Token and profile as read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub profile: UserProfile,
}

pub struct CredentialStore {
    backend: Arc<dyn KeyValueStorage>,
    write_gate: Mutex<()>,
}

/// Exclusive write access to the credential keys, held for as long as it lives.
pub struct CredentialWriter<'a> {
    store: &'a CredentialStore,
    _gate: MutexGuard<'a, ()>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn KeyValueStorage>) -> Self {
        Self { backend, write_gate: Mutex::new(()) }
    }

    /// Wait for the single-writer gate.
    pub async fn writer(&self) -> CredentialWriter<'_> {
        CredentialWriter { store: self, _gate: self.write_gate.lock().await }
    }

    pub async fn save_session(&self, token: &str, profile: &UserProfile) -> Result<()> {
        self.writer().await.save_session(token, profile).await
    }

    pub async fn clear_session(&self) -> Result<()> {
        self.writer().await.clear_session().await
    }

    /// Both values present and the profile parses, or nothing. Read failures and
    /// malformed JSON degrade to `None` rather than an error.
    pub async fn load_session(&self) -> Option<StoredSession> {
        let backend = self.backend.clone();
        let read = run_blocking(move || {
            let token = backend.get(keys::AUTH_TOKEN)?;
            let user = backend.get(keys::USER_DATA)?;
            Ok((token, user))
        })
        .await;
        let (token, user) = match read {
            Ok(pair) => pair,
            Err(e) => {
                warn!(target: "gateguard::credentials", "session read failed: {:#}", e);
                return None;
            }
        };
        let token = token.as_ref().and_then(KvValue::as_str).filter(|t| !t.is_empty())?.to_string();
        let raw = user.as_ref().and_then(KvValue::as_str)?;
        match serde_json::from_str::<UserProfile>(raw) {
            Ok(profile) => Some(StoredSession { token, profile }),
            Err(e) => {
                warn!(target: "gateguard::credentials", "stored user_data is malformed: {}", e);
                None
            }
        }
    }

    /// Raw access for UI-owned keys (`app_language`, `theme_mode`).
    pub async fn get_value(&self, key: &'static str) -> Result<Option<KvValue>> {
        let backend = self.backend.clone();
        run_blocking(move || backend.get(key)).await
    }

    pub async fn set_value(&self, key: &'static str, value: KvValue) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        let backend = self.backend.clone();
        run_blocking(move || backend.set(key, value)).await
    }
}

impl CredentialWriter<'_> {
    /// Persist token and profile together. If the write fails, both keys are
    /// removed (best effort) so that no half-saved session is left behind.
    pub async fn save_session(&self, token: &str, profile: &UserProfile) -> Result<()> {
        let json = serde_json::to_string(profile).context("serialising user profile")?;
        let backend = self.store.backend.clone();
        let token = token.to_string();
        let res = run_blocking(move || {
            let entries = [(keys::AUTH_TOKEN, KvValue::Str(token)), (keys::USER_DATA, KvValue::Str(json))];
            match backend.set_many(&entries) {
                Ok(()) => Ok(()),
                Err(e) => {
                    if let Err(undo) = backend.remove_many(&[keys::AUTH_TOKEN, keys::USER_DATA]) {
                        warn!(target: "gateguard::credentials", "rollback after failed save also failed: {:#}", undo);
                    }
                    Err(e)
                }
            }
        })
        .await;
        match &res {
            Ok(()) => debug!(target: "gateguard::credentials", "session saved user={}", profile.username),
            Err(e) => warn!(target: "gateguard::credentials", "session save failed user={}: {:#}", profile.username, e),
        }
        res
    }

    /// Remove the session keys. Succeeds when nothing is stored.
    pub async fn clear_session(&self) -> Result<()> {
        let backend = self.store.backend.clone();
        let res = run_blocking(move || {
            backend.remove_many(&[keys::AUTH_TOKEN, keys::USER_DATA, keys::REFRESH_TOKEN])
        })
        .await;
        if let Err(e) = &res {
            warn!(target: "gateguard::credentials", "session clear failed: {:#}", e);
        }
        res
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| anyhow!("storage task aborted: {}", e))?
}
