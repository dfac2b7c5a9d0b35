use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of roles. Each maps to exactly one landing surface; `Admin` is the
/// superset role that may also visit every department surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Armament,
    Supply,
    Technical,
    HumanResources,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Admin, Role::Armament, Role::Supply, Role::Technical, Role::HumanResources];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Armament => "armament",
            Role::Supply => "supply",
            Role::Technical => "technical",
            Role::HumanResources => "human_resources",
        }
    }

    pub fn is_department(&self) -> bool { !matches!(self, Role::Admin) }

    pub fn departments() -> impl Iterator<Item = Role> {
        Self::ALL.into_iter().filter(Role::is_department)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "unrecognised role '{}'", self.0) }
}

impl std::error::Error for UnknownRole {}

/// Exact match on the wire names; anything else is rejected, never defaulted.
impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

fn default_active() -> bool { true }

/// Authenticated user as persisted under `user_data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, username: impl Into<String>, display_name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            display_name: display_name.into(),
            email: email.into(),
            role,
            department: None,
            rank: None,
            phone: None,
            last_login: None,
            is_active: true,
        }
    }

    pub fn with_department(mut self, d: impl Into<String>) -> Self { self.department = Some(d.into()); self }
    pub fn with_rank(mut self, r: impl Into<String>) -> Self { self.rank = Some(r.into()); self }
    pub fn with_phone(mut self, p: impl Into<String>) -> Self { self.phone = Some(p.into()); self }
    pub fn inactive(mut self) -> Self { self.is_active = false; self }
}
