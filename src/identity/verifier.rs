use anyhow::{anyhow, Result};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use super::profile::{Role, UserProfile};

/// Decides whether a username/password pair is a valid login and, if so, which
/// profile it yields. `Ok(None)` is a mismatch; `Err` means the verifier itself
/// could not answer (e.g. a remote backend is unreachable).
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> Result<Option<UserProfile>>;
}

pub(crate) fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let argon2 = Argon2::default();
    let phc = argon2.hash_password(password.as_bytes(), &salt).map_err(|e| anyhow!(e.to_string()))?.to_string();
    Ok(phc)
}

pub(crate) fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2.verify_password(password.as_bytes(), &parsed).is_ok()
    } else { false }
}

#[derive(Debug, Clone)]
struct CredentialRecord {
    username: String,
    password_hash: String,
    template: UserProfile,
}

/// Fixed, closed set of accounts standing in for a real credential backend.
/// Plain passwords are hashed on construction and never kept.
#[derive(Debug, Clone)]
pub struct StaticCredentialTable {
    records: Vec<CredentialRecord>,
    // Verified against when the username is unknown so both paths cost the same.
    decoy_hash: String,
}

impl StaticCredentialTable {
    /// The five built-in accounts, one per role.
    pub fn seeded() -> Result<Self> {
        Self::from_accounts(default_accounts())
    }

    pub fn from_accounts<I, U, P>(accounts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (U, P, UserProfile)>,
        U: Into<String>,
        P: AsRef<str>,
    {
        let mut records = Vec::new();
        for (username, password, template) in accounts {
            records.push(CredentialRecord {
                username: username.into(),
                password_hash: hash_password(password.as_ref())?,
                template,
            });
        }
        let decoy_hash = hash_password("decoy-password-never-matches")?;
        Ok(Self { records, decoy_hash })
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.username.as_str())
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

impl CredentialVerifier for StaticCredentialTable {
    fn verify(&self, username: &str, password: &str) -> Result<Option<UserProfile>> {
        match self.records.iter().find(|r| r.username == username) {
            Some(rec) if verify_password(&rec.password_hash, password) => Ok(Some(rec.template.clone())),
            Some(_) => Ok(None),
            None => {
                let _ = verify_password(&self.decoy_hash, password);
                Ok(None)
            }
        }
    }
}

/// Built-in demo accounts: (username, password, profile template).
pub fn default_accounts() -> Vec<(&'static str, &'static str, UserProfile)> {
    vec![
        (
            "admin",
            "admin123",
            UserProfile::new("1", "admin", "System Administrator", "admin@gate.local", Role::Admin)
                .with_department("Command")
                .with_rank("Colonel"),
        ),
        (
            "armament",
            "armament123",
            UserProfile::new("2", "armament", "Armament Officer", "armament@gate.local", Role::Armament)
                .with_department("Armament")
                .with_rank("Major"),
        ),
        (
            "supply",
            "supply123",
            UserProfile::new("3", "supply", "Supply Officer", "supply@gate.local", Role::Supply)
                .with_department("Supply")
                .with_rank("Captain"),
        ),
        (
            "technical",
            "technical123",
            UserProfile::new("4", "technical", "Technical Officer", "technical@gate.local", Role::Technical)
                .with_department("Technical Affairs")
                .with_rank("Captain"),
        ),
        (
            "hr",
            "hr123",
            UserProfile::new("5", "hr", "Human Resources Officer", "hr@gate.local", Role::HumanResources)
                .with_department("Human Resources")
                .with_rank("Lieutenant"),
        ),
    ]
}
