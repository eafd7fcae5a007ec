//! Lifecycle event channel.
//!
//! # Responsibilities
//! - Observer registration and ordered synchronous dispatch per event kind
//! - Best-effort fan-out: one panicking listener never suppresses the rest
//! - Shared by reference down a client hierarchy: a child always reuses its
//!   parent's channel, so a listener registered anywhere on the shared
//!   channel observes emissions triggered through any instance in the tree
//!
//! # Design Decisions
//! - The channel is an explicitly passed `Arc` handle, never module-level
//!   state; each client holds an owning-or-shared reference decided at
//!   construction
//! - Sharing is by channel object identity, not relationship-aware: a
//!   listener attached on a child fires for a grandchild's calls because
//!   both hold the same channel

use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::RwLock;

use serde::Serialize;

use crate::error::ClientError;

/// Lifecycle event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Fired once per call, before the request is handed to the transport.
    Request,
    /// Fired once per completed call, success or failure, before the
    /// caller's result is returned.
    Response,
    /// Fired after a topology discovery probe.
    Sniff,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Request => "request",
            EventKind::Response => "response",
            EventKind::Sniff => "sniff",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to every emitted event.
#[derive(Debug, Clone, Serialize)]
pub struct EventMeta {
    /// Resolved instance name of the client that issued the call.
    pub client: String,
    /// Trace id produced by the issuing instance's generator.
    pub request_id: String,
    /// HTTP method of the call.
    pub method: String,
    /// Request path of the call.
    pub path: String,
    /// Response status, present on `response` events when the server
    /// answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Wall-clock duration of the call in milliseconds, present on
    /// `response` events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Listener callback: error slot (`None` on success) plus event metadata.
pub type EventListener = Box<dyn Fn(Option<&ClientError>, &EventMeta) + Send + Sync>;

/// Observer lists per event kind.
///
/// Listeners run synchronously in registration order while the channel's
/// read lock is held, so they must not register new listeners from inside a
/// callback.
#[derive(Default)]
pub struct EventChannel {
    listeners: RwLock<HashMap<EventKind, Vec<EventListener>>>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an event kind. Listeners fire in registration order.
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(Option<&ClientError>, &EventMeta) + Send + Sync + 'static,
    {
        let mut listeners = match self.listeners.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.entry(kind).or_default().push(Box::new(listener));
    }

    /// Notify every listener registered for `kind` on this channel.
    ///
    /// Dispatch is best-effort: a panicking listener is logged and the
    /// remaining listeners still run.
    pub fn emit(&self, kind: EventKind, error: Option<&ClientError>, meta: &EventMeta) {
        let listeners = match self.listeners.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for listener in listeners.get(&kind).into_iter().flatten() {
            if catch_unwind(AssertUnwindSafe(|| listener(error, meta))).is_err() {
                tracing::warn!(
                    event = %kind,
                    client = %meta.client,
                    request_id = %meta.request_id,
                    "event listener panicked; continuing fan-out"
                );
            }
        }
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        let listeners = match self.listeners.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("request_listeners", &self.listener_count(EventKind::Request))
            .field(
                "response_listeners",
                &self.listener_count(EventKind::Response),
            )
            .field("sniff_listeners", &self.listener_count(EventKind::Sniff))
            .finish()
    }
}
