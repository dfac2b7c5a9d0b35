use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, warn};

/// Map size at which a failure also sweeps out idle entries.
pub(super) const PRUNE_AT: usize = 1024;
/// Hard ceiling on tracked usernames.
pub(super) const MAX_TRACKED: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Failures {
    count: u32,
    last_failure: Instant,
    locked_until: Option<Instant>,
}

impl Failures {
    /// Neither locked nor recently failed; forgetting it changes nothing observable.
    fn is_idle(&self, now: Instant, window: Duration) -> bool {
        match self.locked_until {
            Some(until) => now >= until,
            None => now.saturating_duration_since(self.last_failure) >= window,
        }
    }
}

/// Consecutive-failure counter per username with a temporary lockout.
///
/// Usernames are tracked whether or not they exist, so a lockout reveals
/// nothing about which accounts are real. Failures older than the lockout
/// window no longer count, and idle entries are swept once the map grows, so
/// a stream of random usernames cannot grow it without bound.
pub struct LoginThrottle {
    max_attempts: u32,
    lockout: Duration,
    state: Mutex<HashMap<String, Failures>>,
}

impl LoginThrottle {
    pub fn new(max_attempts: u32, lockout: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), lockout, state: Mutex::new(HashMap::new()) }
    }

    pub fn is_locked(&self, username: &str) -> bool { self.is_locked_at(username, Instant::now()) }

    pub fn is_locked_at(&self, username: &str, now: Instant) -> bool {
        let mut m = self.state.lock();
        match m.get(username).and_then(|f| f.locked_until) {
            Some(until) if now < until => true,
            Some(_) => {
                // lock elapsed: start counting afresh
                m.remove(username);
                false
            }
            None => false,
        }
    }

    /// Count a failure; returns true if this failure triggered a lockout.
    pub fn record_failure(&self, username: &str) -> bool { self.record_failure_at(username, Instant::now()) }

    pub fn record_failure_at(&self, username: &str, now: Instant) -> bool {
        let mut m = self.state.lock();
        if !m.contains_key(username) && m.len() >= PRUNE_AT {
            self.prune(&mut m, now);
        }
        let window = self.lockout;
        let f = m
            .entry(username.to_string())
            .and_modify(|f| {
                if f.is_idle(now, window) {
                    *f = Failures { count: 0, last_failure: now, locked_until: None };
                }
            })
            .or_insert(Failures { count: 0, last_failure: now, locked_until: None });
        f.count += 1;
        f.last_failure = now;
        if f.count >= self.max_attempts {
            f.locked_until = Some(now + self.lockout);
            f.count = 0;
            warn!(target: "gateguard::auth", "user={} locked for {}s after {} failed attempts", username, self.lockout.as_secs(), self.max_attempts);
            return true;
        }
        false
    }

    fn prune(&self, m: &mut HashMap<String, Failures>, now: Instant) {
        let before = m.len();
        m.retain(|_, f| !f.is_idle(now, self.lockout));
        // still full of live entries: drop the stalest unlocked ones first
        if m.len() >= MAX_TRACKED {
            let mut by_age: Vec<(bool, Instant, String)> =
                m.iter().map(|(k, f)| (f.locked_until.is_some(), f.last_failure, k.clone())).collect();
            by_age.sort();
            for (_, _, k) in by_age.into_iter().take(m.len() + 1 - MAX_TRACKED) {
                m.remove(&k);
            }
        }
        if m.len() != before {
            debug!(target: "gateguard::auth", "throttle pruned {} idle entries, {} tracked", before - m.len(), m.len());
        }
    }

    pub fn record_success(&self, username: &str) {
        self.state.lock().remove(username);
    }

    /// Number of usernames currently tracked.
    pub fn tracked(&self) -> usize { self.state.lock().len() }

    pub fn failures(&self, username: &str) -> u32 {
        self.state.lock().get(username).map(|f| f.count).unwrap_or(0)
    }
}
