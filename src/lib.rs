//! Async HTTP client for multi-node service clusters.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────────┐
//!                    │                  CLIENT HIERARCHY                   │
//!                    │                                                     │
//!   Client::new ─────┼─▶ root Client ──child()──▶ child Client ──child()─▶ ...
//!                    │        │                        │                   │
//!                    │        │ resolved config        │ parent config +   │
//!                    │        │ (defaults + config)    │ overrides         │
//!                    │        │                        │                   │
//!                    │        ├── ExtensionRegistry ──▶ snapshot copy      │
//!                    │        │        (isolated after the copy)           │
//!                    │        │                                            │
//!                    │        ├── EventChannel ◀──── shared by reference ──┤
//!                    │        │   (request / response / sniff fan-in)      │
//!                    │        │                                            │
//!                    │        └── Transport ◀──────── shared by reference ─┤
//!                    │            (node rotation, timeout, retry, backoff) │
//!                    └────────────────────────────────────────────────────┘
//! ```
//!
//! Every API call emits `request` before the transport is invoked and
//! `response` after completion, so a single listener on a root client
//! observes traffic from the whole hierarchy.

// Core subsystems
pub mod client;
pub mod config;
pub mod transport;

// Hierarchy plumbing
pub mod events;
pub mod extensions;
pub mod request_id;

// Cross-cutting concerns
pub mod error;
pub mod resilience;

pub use client::{Client, ExtensionContext};
pub use config::{load_config, Auth, ClientConfig, ConfigError, ConfigOverrides};
pub use error::{ClientError, ClientResult};
pub use events::{EventChannel, EventKind, EventMeta};
pub use extensions::{Extension, ExtensionError, ExtensionFuture, ExtensionRegistry};
pub use request_id::{RequestIdGenerator, SequenceRequestIds, UuidRequestIds};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};

pub use reqwest::Method;
