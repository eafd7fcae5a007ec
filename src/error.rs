//! Client-facing error definitions.

use thiserror::Error;

use crate::extensions::ExtensionError;

/// Errors surfaced by client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or connection-level failure, after retries were exhausted.
    #[error("connection error: {0}")]
    Connection(String),

    /// Request did not complete within the configured timeout, after
    /// retries were exhausted.
    #[error("request timed out after {attempts} attempt(s) of {timeout_ms} ms")]
    Timeout { timeout_ms: u64, attempts: u32 },

    /// The call completed but the server answered with an error status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Extension registration or lookup failed.
    #[error(transparent)]
    Extension(#[from] ExtensionError),

    /// Configuration rejected at client construction.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// True when the error is the distinguished timeout kind.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }

    /// Response status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
