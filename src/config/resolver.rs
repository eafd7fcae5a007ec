//! Configuration override resolution.
//!
//! Merging is field-by-field, whole-value replacement: a field present in
//! the override set replaces the parent's resolved value entirely (headers
//! and auth are never merged key-by-key), and an absent field inherits the
//! parent's resolved value verbatim. There are no error conditions at this
//! layer.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::schema::{lowercase_keys, Auth, ClientConfig};
use crate::request_id::RequestIdGenerator;
use crate::transport::Transport;

/// Override set accepted by `Client::child`.
///
/// Every field is optional; unset fields inherit from the parent. Built
/// with chained `with_*` calls:
///
/// ```ignore
/// let child = client.child(
///     ConfigOverrides::new()
///         .with_name("ingest-child")
///         .with_request_timeout_ms(25)
///         .with_max_retries(0),
/// );
/// ```
#[derive(Default, Clone)]
pub struct ConfigOverrides {
    pub headers: Option<HashMap<String, String>>,
    pub request_timeout_ms: Option<u64>,
    pub max_retries: Option<u32>,
    pub auth: Option<Auth>,
    pub request_ids: Option<Arc<dyn RequestIdGenerator>>,
    pub name: Option<String>,

    /// Replacement transport. Handled by `Client::child` directly, not by
    /// the resolver; when unset the child shares the parent's transport by
    /// reference.
    pub transport: Option<Arc<dyn Transport>>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default header set entirely.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Add one header to the replacement set, creating it if needed.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_request_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = Some(ms);
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Replace the credential descriptor entirely.
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_request_ids(mut self, generator: impl RequestIdGenerator + 'static) -> Self {
        self.request_ids = Some(Arc::new(generator));
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }
}

impl std::fmt::Debug for ConfigOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigOverrides")
            .field("headers", &self.headers)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("auth", &self.auth)
            .field("name", &self.name)
            .field("request_ids", &self.request_ids.is_some())
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

/// Merge a parent's resolved config with an override set.
pub fn resolve(parent: &ClientConfig, overrides: ConfigOverrides) -> ClientConfig {
    let mut resolved = parent.clone();

    if let Some(headers) = overrides.headers {
        resolved.headers = lowercase_keys(headers);
    }
    if let Some(ms) = overrides.request_timeout_ms {
        resolved.request_timeout_ms = ms;
    }
    if let Some(retries) = overrides.max_retries {
        resolved.max_retries = retries;
    }
    if let Some(auth) = overrides.auth {
        resolved.auth = auth;
    }
    if let Some(generator) = overrides.request_ids {
        resolved.request_ids = generator;
    }
    if let Some(name) = overrides.name {
        resolved.name = name;
    }

    resolved
}
