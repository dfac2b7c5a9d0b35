//! Process-wide service wiring. Built once at startup and passed by reference
//! to whatever surface drives it (the CLI here, a UI shell elsewhere).

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::identity::{CredentialVerifier, Session, SessionResolver, StaticCredentialTable};
use crate::routing::{NavigationDecision, RoleRouter, Route};
use crate::storage::{CredentialStore, FileKvStorage, KeyValueStorage};

pub struct AppContext {
    pub config: Config,
    pub resolver: SessionResolver,
    pub router: RoleRouter,
}

impl AppContext {
    /// File-backed storage at `config.storage_path` and the built-in account table.
    pub fn from_config(config: Config) -> Result<Self> {
        let backend = FileKvStorage::open(&config.storage_path)
            .with_context(|| format!("opening storage at {}", config.storage_path.display()))?;
        let verifier = StaticCredentialTable::seeded().context("building credential table")?;
        info!(target: "gateguard", "storage='{}' accounts={}", config.storage_path.display(), verifier.len());
        Ok(Self::with_parts(config, Arc::new(backend), Arc::new(verifier)))
    }

    pub fn with_parts(config: Config, backend: Arc<dyn KeyValueStorage>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        let store = Arc::new(CredentialStore::new(backend));
        let resolver = SessionResolver::from_config(&config, verifier, store);
        Self { config, resolver, router: RoleRouter::default() }
    }

    pub fn session(&self) -> Session { self.resolver.current() }

    /// Landing route for the current session.
    pub fn landing_route(&self) -> Route { self.router.resolve_landing_route(&self.resolver.current()) }

    /// Guard a navigation against the current session.
    pub fn navigate(&self, path: &str) -> NavigationDecision {
        self.router.navigate_path(path, &self.resolver.current())
    }
}
