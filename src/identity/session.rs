use base64::Engine;

use super::profile::{Role, UserProfile};

pub type SessionToken = String;

/// Authentication state of the running instance. Exactly one variant holds;
/// "loading" is a UI concern and deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// No resolution attempted yet (process start).
    #[default]
    Unknown,
    Unauthenticated,
    Authenticated(UserProfile),
    /// Last login attempt failed; carries the user-facing reason.
    Error(String),
}

impl Session {
    pub fn is_authenticated(&self) -> bool { matches!(self, Session::Authenticated(_)) }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Session::Authenticated(p) => Some(p),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> { self.profile().map(|p| p.role) }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Session::Error(m) => Some(m.as_str()),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Session::Unknown => "unknown",
            Session::Unauthenticated => "unauthenticated",
            Session::Authenticated(_) => "authenticated",
            Session::Error(_) => "error",
        }
    }
}

/// 256-bit random token, base64url without padding.
pub fn generate_token() -> anyhow::Result<SessionToken> {
    let mut buf = [0u8; 32];
    getrandom::getrandom(&mut buf).map_err(|e| anyhow::anyhow!("token entropy unavailable: {}", e))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf))
}

/// First few characters only; full tokens never reach the logs.
pub(crate) fn token_prefix(token: &str) -> &str {
    let end = token.char_indices().nth(6).map(|(i, _)| i).unwrap_or(token.len());
    &token[..end]
}
