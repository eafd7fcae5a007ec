//! HTTP transport with timeout, retry, and node rotation.
//!
//! # Responsibilities
//! - Drive the underlying HTTP connection pool
//! - Wrap every attempt in the configured per-request timeout
//! - Rotate to the next node and back off between attempts
//! - Distinguish timeout exhaustion from connection failure

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tokio::time::timeout;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::resilience::backoff;
use crate::transport::{NodePool, Transport, TransportRequest, TransportResponse};

const BACKOFF_BASE_MS: u64 = 100;
const BACKOFF_CAP_MS: u64 = 2_000;

/// Default transport: a shared `reqwest` connection pool over the
/// configured node set.
///
/// Cheap to share by reference; a parent and all its derived children hold
/// the same instance (and therefore the same pool) unless an override
/// replaces it.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    pool: NodePool,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            pool: NodePool::new(config.nodes.clone()),
        })
    }

    async fn attempt(&self, node: &Url, request: &TransportRequest) -> Result<TransportResponse, String> {
        let url = node
            .join(&request.path)
            .map_err(|e| format!("invalid request path '{}': {}", request.path, e))?;

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(build_header_map(&request.headers));
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| e.to_string())?;

        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse> {
        let attempts = request.max_retries + 1;
        let mut last_error = String::new();
        let mut timed_out = false;

        for attempt in 0..attempts {
            if attempt > 0 {
                metrics::counter!("client_request_retries_total").increment(1);
                tokio::time::sleep(backoff::retry_delay(attempt, BACKOFF_BASE_MS, BACKOFF_CAP_MS))
                    .await;
            }

            let node = match self.pool.next() {
                Some(node) => node,
                None => {
                    return Err(ClientError::Config("no nodes configured".into()));
                }
            };

            match timeout(request.timeout, self.attempt(&node, &request)).await {
                Ok(Ok(response)) => return Ok(response),
                Ok(Err(e)) => {
                    tracing::warn!(node = %node, attempt, error = %e, "request failed");
                    last_error = e;
                    timed_out = false;
                }
                Err(_) => {
                    tracing::warn!(
                        node = %node,
                        attempt,
                        timeout_ms = request.timeout.as_millis() as u64,
                        "request timed out"
                    );
                    timed_out = true;
                }
            }
        }

        if timed_out {
            Err(ClientError::Timeout {
                timeout_ms: request.timeout.as_millis() as u64,
                attempts,
            })
        } else {
            Err(ClientError::Connection(last_error))
        }
    }
}

/// Convert resolved string headers to a typed header map. Invalid names or
/// values are logged and skipped rather than failing the call.
fn build_header_map(headers: &HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = match HeaderName::from_bytes(key.as_bytes()) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(header = %key, error = %e, "skipping invalid header name");
                continue;
            }
        };
        let value = match HeaderValue::from_str(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(header = %key, error = %e, "skipping invalid header value");
                continue;
            }
        };
        map.insert(name, value);
    }
    map
}
