//! Transport boundary between client instances and the cluster.
//!
//! # Data Flow
//! ```text
//! Client call
//!     → TransportRequest (resolved headers/auth/timeout/retry settings)
//!     → Transport::send (node selection, attempts, backoff)
//!     → TransportResponse (status + body) or ClientError
//! ```
//!
//! # Design Decisions
//! - The transport (and its connection pool) is shared by reference down a
//!   client hierarchy; a child only gets its own when the override supplies
//!   a replacement
//! - An HTTP response of any status completes the call at this layer; the
//!   client maps error statuses afterwards, so the `response` event can
//!   still carry them

pub mod http;
pub mod pool;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::ClientResult;

pub use http::HttpTransport;
pub use pool::NodePool;

/// One outgoing call with all settings already resolved by the client.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub path: String,
    /// Resolved headers, lowercase keys, auth header already generated.
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
    /// Deadline applied to each individual attempt.
    pub timeout: Duration,
    /// Retry attempts after the first failure.
    pub max_retries: u32,
}

/// A completed call, regardless of HTTP status.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

/// Opaque service that moves requests to the cluster and back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the call, honoring the request's timeout and retry settings.
    async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse>;
}
