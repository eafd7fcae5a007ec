//! Configuration schema definitions.
//!
//! This module defines the resolved configuration a client instance owns.
//! All data-bearing types derive Serde traits so a config can also be
//! deserialized from a config file; the request-id generator is a runtime
//! value and is skipped during (de)serialization.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::request_id::{RequestIdGenerator, UuidRequestIds};

/// Resolved configuration for one client instance.
///
/// Immutable once a client owns it: deriving a child never mutates the
/// parent's config. Header keys are normalized to lowercase so lookups are
/// case-insensitive.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Cluster node base URLs, rotated round-robin by the transport.
    pub nodes: Vec<Url>,

    /// Default headers sent on every request (lowercase keys).
    pub headers: HashMap<String, String>,

    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Per-request timeout in milliseconds, applied to each attempt.
    pub request_timeout_ms: u64,

    /// Retry attempts after the first failure.
    pub max_retries: u32,

    /// Credential descriptor used to generate the `Authorization` header.
    pub auth: Auth,

    /// Instance label, carried verbatim in all emitted event metadata.
    pub name: String,

    /// Path probed by `sniff()` for topology discovery.
    pub sniff_path: String,

    /// Per-request trace id generator. Runtime value, not part of the file
    /// schema.
    #[serde(skip, default = "default_request_ids")]
    pub request_ids: Arc<dyn RequestIdGenerator>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            nodes: default_nodes(),
            headers: HashMap::new(),
            connect_timeout_ms: 30_000,
            request_timeout_ms: 30_000,
            max_retries: 3,
            auth: Auth::None,
            name: "cluster-client".to_string(),
            sniff_path: "/nodes".to_string(),
            request_ids: default_request_ids(),
        }
    }
}

impl ClientConfig {
    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Normalize header keys to lowercase. Called wherever a config enters
    /// the system (construction, file load, override resolution).
    pub(crate) fn normalize(&mut self) {
        self.headers = lowercase_keys(std::mem::take(&mut self.headers));
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("nodes", &self.nodes)
            .field("headers", &self.headers)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("auth", &self.auth)
            .field("name", &self.name)
            .field("sniff_path", &self.sniff_path)
            .finish()
    }
}

fn default_nodes() -> Vec<Url> {
    vec![Url::parse("http://127.0.0.1:8080").expect("default node URL is valid")]
}

fn default_request_ids() -> Arc<dyn RequestIdGenerator> {
    Arc::new(UuidRequestIds)
}

/// Lowercase all keys of a header map.
pub(crate) fn lowercase_keys(headers: HashMap<String, String>) -> HashMap<String, String> {
    headers
        .into_iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v))
        .collect()
}

/// Credential descriptor.
///
/// The variant selects the `Authorization` header generated at request time;
/// overriding `auth` on a child replaces the descriptor entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Auth {
    /// No credentials; no `Authorization` header is sent.
    #[default]
    None,

    /// HTTP basic auth.
    Basic { username: String, password: String },

    /// Pre-issued API key.
    ApiKey(String),
}

impl Auth {
    /// Value for the `Authorization` header, or `None` for [`Auth::None`].
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            Auth::None => None,
            Auth::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                Some(format!("Basic {encoded}"))
            }
            Auth::ApiKey(key) => Some(format!("ApiKey {key}")),
        }
    }
}
