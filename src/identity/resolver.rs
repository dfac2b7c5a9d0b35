//! The session resolver: sole owner of the `Session` state and the authority on
//! what counts as a valid login.
//!
//! Login and status checks draw a ticket from a monotonic counter before they
//! suspend, and logout advances the same counter. A result is committed only if
//! its ticket is still the newest when it settles, and login persistence happens
//! under the credential store's write gate after the same check, so a superseded attempt can neither overwrite a newer state
//! nor leave a session on disk that the in-memory state does not reflect.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::profile::UserProfile;
use super::session::{generate_token, token_prefix, Session};
use super::throttle::LoginThrottle;
use super::verifier::CredentialVerifier;
use crate::config::Config;
use crate::error::AppError;
use crate::storage::{CredentialStore, StoredSession};
use crate::tprintln;

pub struct SessionResolver {
    verifier: Arc<dyn CredentialVerifier>,
    store: Arc<CredentialStore>,
    throttle: LoginThrottle,
    session_ttl: Option<Duration>,
    state: RwLock<Session>,
    seq: AtomicU64,
}

impl SessionResolver {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, store: Arc<CredentialStore>) -> Self {
        let d = Config::default();
        Self {
            verifier,
            store,
            throttle: LoginThrottle::new(d.max_login_attempts, d.lockout),
            session_ttl: d.session_ttl,
            state: RwLock::new(Session::Unknown),
            seq: AtomicU64::new(0),
        }
    }

    pub fn from_config(cfg: &Config, verifier: Arc<dyn CredentialVerifier>, store: Arc<CredentialStore>) -> Self {
        Self::new(verifier, store)
            .with_throttle(LoginThrottle::new(cfg.max_login_attempts, cfg.lockout))
            .with_session_ttl(cfg.session_ttl)
    }

    pub fn with_throttle(mut self, throttle: LoginThrottle) -> Self { self.throttle = throttle; self }

    pub fn with_session_ttl(mut self, ttl: Option<Duration>) -> Self { self.session_ttl = ttl; self }

    /// Snapshot of the current state.
    pub fn current(&self) -> Session { self.state.read().clone() }

    pub fn throttle(&self) -> &LoginThrottle { &self.throttle }

    fn next_ticket(&self) -> u64 { self.seq.fetch_add(1, Ordering::SeqCst) + 1 }

    fn is_latest(&self, ticket: u64) -> bool { self.seq.load(Ordering::SeqCst) == ticket }

    /// Store `next` if `ticket` is still the newest; returns whether it was stored.
    fn commit(&self, ticket: u64, next: Session) -> bool {
        let mut w = self.state.write();
        if !self.is_latest(ticket) {
            debug!(target: "gateguard::session", "discarding stale result ticket={} kind={}", ticket, next.kind());
            return false;
        }
        if w.kind() != next.kind() {
            info!(target: "gateguard::session", "session {} -> {}", w.kind(), next.kind());
        }
        *w = next;
        true
    }

    fn fail(&self, ticket: u64, err: AppError) -> Session {
        let s = Session::Error(err.message().to_string());
        if self.commit(ticket, s.clone()) { s } else { Session::Error(AppError::superseded().message().to_string()) }
    }

    /// Verify credentials, persist on success and return the resulting session.
    /// Never fails from the caller's point of view: every problem is a `Session::Error`.
    pub async fn login(&self, username: &str, password: &str) -> Session {
        let ticket = self.next_ticket();

        if self.throttle.is_locked(username) {
            info!(target: "gateguard::auth", "login refused user={} reason=locked", username);
            return self.fail(ticket, AppError::account_locked());
        }

        let verifier = self.verifier.clone();
        let (u, p) = (username.to_string(), password.to_string());
        let verdict = match tokio::task::spawn_blocking(move || verifier.verify(&u, &p)).await {
            Ok(v) => v,
            Err(e) => Err(anyhow::anyhow!("verifier task aborted: {}", e)),
        };

        let mut profile = match verdict {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                self.throttle.record_failure(username);
                info!(target: "gateguard::auth", "login failed user={}", username);
                return self.fail(ticket, AppError::invalid_credentials());
            }
            Err(e) => {
                warn!(target: "gateguard::auth", "credential verifier unavailable: {:#}", e);
                return self.fail(ticket, AppError::internal("verifier_unavailable", "authentication service unavailable"));
            }
        };

        if !profile.is_active {
            info!(target: "gateguard::auth", "login refused user={} reason=inactive", username);
            return self.fail(ticket, AppError::account_inactive());
        }
        self.throttle.record_success(username);
        profile.last_login = Some(Utc::now());

        let token = match generate_token() {
            Ok(t) => t,
            Err(e) => {
                warn!(target: "gateguard::auth", "{:#}", e);
                return self.fail(ticket, AppError::not_persisted());
            }
        };

        let writer = self.store.writer().await;
        if !self.is_latest(ticket) {
            debug!(target: "gateguard::session", "login superseded before persist user={} ticket={}", username, ticket);
            return Session::Error(AppError::superseded().message().to_string());
        }
        if let Err(e) = writer.save_session(&token, &profile).await {
            warn!(target: "gateguard::auth", "login for user={} not persisted: {:#}", username, e);
            return self.fail(ticket, AppError::not_persisted());
        }
        tprintln!("session.issue user={} role={} token={}..", profile.username, profile.role, token_prefix(&token));
        let session = Session::Authenticated(profile);
        let committed = self.commit(ticket, session.clone());
        drop(writer);
        if committed {
            info!(target: "gateguard::auth", "login ok user={} role={}", username, session.role().map(|r| r.as_str()).unwrap_or("-"));
            session
        } else {
            Session::Error(AppError::superseded().message().to_string())
        }
    }

    /// Rebuild the session from storage. Corrupt, partial or expired data is
    /// `Unauthenticated`; this never reports an error.
    pub async fn check_auth_status(&self) -> Session {
        let ticket = self.next_ticket();
        let writer = self.store.writer().await;
        let resolved = match self.store.load_session().await {
            Some(StoredSession { profile, token }) if self.is_expired(&profile) => {
                info!(target: "gateguard::session", "stored session expired user={} token={}..", profile.username, token_prefix(&token));
                let _ = writer.clear_session().await;
                Session::Unauthenticated
            }
            Some(StoredSession { profile, .. }) => Session::Authenticated(profile),
            None => Session::Unauthenticated,
        };
        let committed = self.commit(ticket, resolved.clone());
        drop(writer);
        if committed { resolved } else { self.current() }
    }

    /// Clear stored credentials and drop to `Unauthenticated`. A storage error is
    /// logged and otherwise ignored.
    ///
    /// Logout always wins. The state is overwritten without a ticket check and
    /// the sequence is bumped under the same lock, so an attempt still in
    /// flight settles as stale instead of resurrecting the session.
    pub async fn logout(&self) {
        let writer = self.store.writer().await;
        if let Err(e) = writer.clear_session().await {
            warn!(target: "gateguard::session", "logout could not clear storage: {:#}", e);
        }
        {
            let mut w = self.state.write();
            self.seq.fetch_add(1, Ordering::SeqCst);
            if w.kind() != Session::Unauthenticated.kind() {
                info!(target: "gateguard::session", "session {} -> unauthenticated (logout)", w.kind());
            }
            *w = Session::Unauthenticated;
        }
        drop(writer);
    }

    fn is_expired(&self, profile: &UserProfile) -> bool {
        let Some(ttl) = self.session_ttl else { return false; };
        let Some(at) = profile.last_login else { return true; };
        let Ok(ttl) = chrono::Duration::from_std(ttl) else { return false; };
        Utc::now() > at + ttl
    }
}
