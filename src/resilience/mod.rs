//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to a node:
//!     → transport wraps each attempt in a timeout
//!     → on failure: rotate to the next node, wait backoff.rs delay, retry
//!     → retries exhausted: settle with a timeout or connection error
//! ```
//!
//! # Design Decisions
//! - Every attempt has a deadline; timeouts are never open-ended
//! - Jittered backoff prevents synchronized retry bursts across clients

pub mod backoff;
