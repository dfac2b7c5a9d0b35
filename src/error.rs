//! Unified error model for the session core.
//! Internal plumbing uses `anyhow`; everything that crosses the resolver or
//! router boundary is folded into `AppError` and from there into a
//! `Session::Error` message, so nothing reaches the UI as a raw error dump.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    #[error("{code}: {message}")]
    Auth { code: String, message: String },
    #[error("{code}: {message}")]
    Locked { code: String, message: String },
    #[error("{code}: {message}")]
    Storage { code: String, message: String },
    #[error("{code}: {message}")]
    InvalidInput { code: String, message: String },
    #[error("{code}: {message}")]
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Auth { code, .. }
            | AppError::Locked { code, .. }
            | AppError::Storage { code, .. }
            | AppError::InvalidInput { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Auth { message, .. }
            | AppError::Locked { message, .. }
            | AppError::Storage { message, .. }
            | AppError::InvalidInput { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn auth<S: Into<String>>(code: S, msg: S) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn locked<S: Into<String>>(code: S, msg: S) -> Self { AppError::Locked { code: code.into(), message: msg.into() } }
    pub fn storage<S: Into<String>>(code: S, msg: S) -> Self { AppError::Storage { code: code.into(), message: msg.into() } }
    pub fn invalid_input<S: Into<String>>(code: S, msg: S) -> Self { AppError::InvalidInput { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// The single message shown for any username/password mismatch.
    pub fn invalid_credentials() -> Self { Self::auth("invalid_credentials", "invalid credentials") }
    pub fn account_inactive() -> Self { Self::auth("account_inactive", "account inactive") }
    pub fn account_locked() -> Self { Self::locked("account_locked", "account temporarily locked") }
    pub fn not_persisted() -> Self { Self::storage("session_not_persisted", "could not persist session") }
    pub fn superseded() -> Self { Self::internal("login_superseded", "login superseded") }

    /// True when the failure came from user input rather than the host.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, AppError::Auth { .. } | AppError::Locked { .. } | AppError::InvalidInput { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Default mapping: anything bubbling out of the plumbing is a storage fault
        AppError::Storage { code: "storage_error".into(), message: format!("{:#}", err) }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
