//! Shared error type across statscope crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed config or query.
    BadRequest,
    /// Referenced entity does not exist.
    NotFound,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, StatscopeError>;

/// Unified error type used by core and admin.
#[derive(Debug, Error)]
pub enum StatscopeError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl StatscopeError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            StatscopeError::BadRequest(_) => ClientCode::BadRequest,
            StatscopeError::NotFound(_) => ClientCode::NotFound,
            StatscopeError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            StatscopeError::Internal(_) => ClientCode::Internal,
        }
    }
}
