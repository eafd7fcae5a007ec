//! Client instance composition and hierarchy derivation.
//!
//! # Data Flow
//! ```text
//! Client::new(config)
//!     → validated, resolved ClientConfig
//!     → fresh EventChannel + empty ExtensionRegistry + default transport
//!
//! client.child(overrides)
//!     → config::resolver (parent resolved config + overrides)
//!     → ExtensionRegistry snapshot (copied, then independent)
//!     → EventChannel shared by reference (unconditional)
//!     → transport shared by reference, unless the override replaces it
//!
//! client.perform(...)
//!     → emit `request` (resolved name + fresh trace id)
//!     → transport.send (resolved headers/auth/timeout/retries)
//!     → emit `response` (error slot None on success)
//!     → caller's Result
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use reqwest::Method;
use serde_json::Value;

use crate::config::{resolver, validate_config, ClientConfig, ConfigOverrides};
use crate::error::{ClientError, ClientResult};
use crate::events::{EventChannel, EventKind, EventMeta};
use crate::extensions::{Extension, ExtensionError, ExtensionRegistry};
use crate::transport::{HttpTransport, Transport, TransportRequest};

/// Context handed to an extension factory at registration time.
///
/// Carries the registering instance's resolved pieces so the produced
/// behavior can issue calls and observe events without owning the client.
#[derive(Clone)]
pub struct ExtensionContext {
    /// Resolved instance name.
    pub name: String,
    /// The registering instance's resolved configuration.
    pub config: Arc<ClientConfig>,
    /// Shared transport handle.
    pub transport: Arc<dyn Transport>,
    /// Shared event channel handle.
    pub events: Arc<EventChannel>,
}

/// One client instance in a hierarchy.
///
/// Owns a resolved configuration and an extension registry; shares the
/// event channel (always) and the transport (unless overridden) with the
/// instance it was derived from.
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    events: Arc<EventChannel>,
    extensions: ExtensionRegistry,
}

impl Client {
    /// Construct a root client with the bundled HTTP transport.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let config = validated(config)?;
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::assemble(config, transport))
    }

    /// Construct a root client over a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> ClientResult<Self> {
        let config = validated(config)?;
        Ok(Self::assemble(config, transport))
    }

    fn assemble(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        tracing::debug!(name = %config.name, nodes = config.nodes.len(), "client created");
        Self {
            config: Arc::new(config),
            transport,
            events: Arc::new(EventChannel::new()),
            extensions: ExtensionRegistry::new(),
        }
    }

    /// Derive a child client.
    ///
    /// The child's configuration is the parent's resolved configuration
    /// with the override fields replaced; its extension registry is a
    /// snapshot copied at this moment; its event channel is the parent's,
    /// shared by reference; its transport is the parent's unless the
    /// override supplies a replacement.
    pub fn child(&self, mut overrides: ConfigOverrides) -> Client {
        let transport = overrides
            .transport
            .take()
            .unwrap_or_else(|| Arc::clone(&self.transport));
        let resolved = resolver::resolve(&self.config, overrides);
        tracing::debug!(parent = %self.config.name, child = %resolved.name, "derived child client");

        Client {
            config: Arc::new(resolved),
            transport,
            events: Arc::clone(&self.events),
            extensions: self.extensions.snapshot(),
        }
    }

    /// Register a namespaced behavior on this instance.
    ///
    /// The factory runs once, immediately, with this instance's context;
    /// the produced behavior becomes visible to this instance and to
    /// children derived after this call, never to ancestors, siblings, or
    /// children derived earlier.
    pub fn extend<F>(&mut self, path: &str, factory: F) -> Result<(), ExtensionError>
    where
        F: FnOnce(&ExtensionContext) -> Extension,
    {
        let context = ExtensionContext {
            name: self.config.name.clone(),
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
            events: Arc::clone(&self.events),
        };
        let behavior = factory(&context);
        self.extensions.register(path, behavior)
    }

    /// Subscribe to lifecycle events on the shared channel.
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(Option<&ClientError>, &EventMeta) + Send + Sync + 'static,
    {
        self.events.on(kind, listener);
    }

    /// Resolve a registered extension behavior.
    pub fn extension(&self, path: &str) -> Result<Extension, ExtensionError> {
        self.extensions.lookup(path)
    }

    /// Resolve and invoke a registered extension behavior.
    pub async fn invoke(&self, path: &str, args: Value) -> ClientResult<Value> {
        let behavior = self.extensions.lookup(path)?;
        behavior(args).await
    }

    /// Perform a generic API call.
    pub async fn perform(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        self.dispatch(method, path, body, None).await
    }

    /// `GET /`: server information.
    pub async fn info(&self) -> ClientResult<Value> {
        self.perform(Method::GET, "/", None).await
    }

    /// `HEAD /`: reachability probe. `Ok(false)` when the server answered
    /// with an error status, `Err` on transport failure.
    pub async fn ping(&self) -> ClientResult<bool> {
        match self.perform(Method::HEAD, "/", None).await {
            Ok(_) => Ok(true),
            Err(ClientError::Http { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Probe the configured discovery path and emit the `sniff` event.
    pub async fn sniff(&self) -> ClientResult<Value> {
        let path = self.config.sniff_path.clone();
        self.dispatch(Method::GET, &path, None, Some(EventKind::Sniff))
            .await
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        follow_up: Option<EventKind>,
    ) -> ClientResult<Value> {
        let request_id = self.config.request_ids.next();
        let mut meta = EventMeta {
            client: self.config.name.clone(),
            request_id: request_id.clone(),
            method: method.to_string(),
            path: path.to_string(),
            status: None,
            duration_ms: None,
        };

        self.events.emit(EventKind::Request, None, &meta);
        metrics::counter!("client_requests_total").increment(1);

        let mut headers = self.config.headers.clone();
        if let Some(authorization) = self.config.auth.authorization_header() {
            headers.insert("authorization".to_string(), authorization);
        }
        headers.insert("x-request-id".to_string(), request_id);

        let request = TransportRequest {
            method,
            path: path.to_string(),
            headers,
            body,
            timeout: self.config.request_timeout(),
            max_retries: self.config.max_retries,
        };

        let started = Instant::now();
        let outcome = self.transport.send(request).await;
        let elapsed = started.elapsed();
        meta.duration_ms = Some(elapsed.as_millis() as u64);
        metrics::histogram!("client_request_duration_seconds").record(elapsed.as_secs_f64());

        let result = match outcome {
            Ok(response) => {
                meta.status = Some(response.status);
                if response.status >= 400 {
                    Err(ClientError::Http {
                        status: response.status,
                        body: response.body.to_string(),
                    })
                } else {
                    Ok(response.body)
                }
            }
            Err(err) => Err(err),
        };

        match &result {
            Ok(_) => {
                self.events.emit(EventKind::Response, None, &meta);
                if let Some(kind) = follow_up {
                    self.events.emit(kind, None, &meta);
                }
            }
            Err(err) => {
                metrics::counter!("client_request_errors_total").increment(1);
                self.events.emit(EventKind::Response, Some(err), &meta);
                if let Some(kind) = follow_up {
                    self.events.emit(kind, Some(err), &meta);
                }
            }
        }

        result
    }

    /// Resolved instance name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Resolved configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Handle to the shared event channel.
    pub fn channel(&self) -> Arc<EventChannel> {
        Arc::clone(&self.events)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("name", &self.config.name)
            .field("nodes", &self.config.nodes.len())
            .field("extensions", &self.extensions)
            .finish()
    }
}

fn validated(mut config: ClientConfig) -> ClientResult<ClientConfig> {
    config.normalize();
    validate_config(&config).map_err(|errors| {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        ClientError::Config(joined)
    })?;
    Ok(config)
}
