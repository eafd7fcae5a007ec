//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Validation is a pure
//! function over the config and returns all errors found, not just the
//! first. It runs before a config is accepted by `Client::new` or the file
//! loader.

use crate::config::schema::{Auth, ClientConfig};

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The node list is empty.
    NoNodes,
    /// A timeout field is zero.
    ZeroTimeout(&'static str),
    /// The instance name is empty.
    EmptyName,
    /// Basic auth was configured without a username.
    EmptyBasicUsername,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NoNodes => write!(f, "at least one node URL is required"),
            ValidationError::ZeroTimeout(field) => {
                write!(f, "{field} must be greater than zero")
            }
            ValidationError::EmptyName => write!(f, "instance name must not be empty"),
            ValidationError::EmptyBasicUsername => {
                write!(f, "basic auth requires a non-empty username")
            }
        }
    }
}

/// Validate a resolved configuration, collecting every failure.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.nodes.is_empty() {
        errors.push(ValidationError::NoNodes);
    }
    if config.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("request_timeout_ms"));
    }
    if config.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_timeout_ms"));
    }
    if config.name.is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    if let Auth::Basic { username, .. } = &config.auth {
        if username.is_empty() {
            errors.push(ValidationError::EmptyBasicUsername);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
