//! Runtime configuration read from `GATEGUARD_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const ENV_STORAGE_PATH: &str = "GATEGUARD_STORAGE_PATH";
pub const ENV_MAX_LOGIN_ATTEMPTS: &str = "GATEGUARD_MAX_LOGIN_ATTEMPTS";
pub const ENV_LOCKOUT_SECS: &str = "GATEGUARD_LOCKOUT_SECS";
pub const ENV_SESSION_TTL_SECS: &str = "GATEGUARD_SESSION_TTL_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File backing the persistent key-value store.
    pub storage_path: PathBuf,
    /// Consecutive failed logins tolerated per username before lockout.
    pub max_login_attempts: u32,
    pub lockout: Duration,
    /// Maximum age of a persisted session, measured from `last_login`. `None` disables expiry.
    pub session_ttl: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("storage").join("prefs.json"),
            max_login_attempts: 5,
            lockout: Duration::from_secs(15 * 60),
            session_ttl: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary variable source; unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let storage_path = lookup(ENV_STORAGE_PATH)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(d.storage_path);
        let max_login_attempts = lookup(ENV_MAX_LOGIN_ATTEMPTS)
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(d.max_login_attempts);
        let lockout = lookup(ENV_LOCKOUT_SECS)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(d.lockout);
        // 0 or garbage means "no expiry"
        let session_ttl = lookup(ENV_SESSION_TTL_SECS)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|n| *n > 0)
            .map(Duration::from_secs);
        Self { storage_path, max_login_attempts, lockout, session_ttl }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let m: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| m.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::from_lookup(lookup_from(&[]));
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.max_login_attempts, 5);
        assert_eq!(cfg.lockout, Duration::from_secs(900));
        assert!(cfg.session_ttl.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = Config::from_lookup(lookup_from(&[
            (ENV_STORAGE_PATH, "/tmp/gg.json"),
            (ENV_MAX_LOGIN_ATTEMPTS, "3"),
            (ENV_LOCKOUT_SECS, "60"),
            (ENV_SESSION_TTL_SECS, "3600"),
        ]));
        assert_eq!(cfg.storage_path, PathBuf::from("/tmp/gg.json"));
        assert_eq!(cfg.max_login_attempts, 3);
        assert_eq!(cfg.lockout, Duration::from_secs(60));
        assert_eq!(cfg.session_ttl, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn garbage_falls_back() {
        let cfg = Config::from_lookup(lookup_from(&[
            (ENV_MAX_LOGIN_ATTEMPTS, "0"),
            (ENV_LOCKOUT_SECS, "soon"),
            (ENV_SESSION_TTL_SECS, "0"),
        ]));
        assert_eq!(cfg.max_login_attempts, 5);
        assert_eq!(cfg.lockout, Duration::from_secs(900));
        assert!(cfg.session_ttl.is_none());
    }
}
