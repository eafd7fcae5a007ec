//! Per-request trace id generation.
//!
//! Every client instance owns one generator; a derived client inherits the
//! parent's generator unless the override supplies its own. Generators are
//! stateful, so two instances configured with separate generators produce
//! fully independent id sequences even when their calls interleave.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Produces one trace id per outgoing request.
pub trait RequestIdGenerator: Send + Sync {
    /// Next id in this generator's sequence.
    fn next(&self) -> String;
}

/// Default generator: a fresh UUID v4 per request.
#[derive(Debug, Default)]
pub struct UuidRequestIds;

impl RequestIdGenerator for UuidRequestIds {
    fn next(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Prefixed monotonic sequence (`prefix-0`, `prefix-1`, ...).
///
/// Useful when calls must be attributable to a specific client instance in
/// shared event streams.
#[derive(Debug)]
pub struct SequenceRequestIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequenceRequestIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl RequestIdGenerator for SequenceRequestIds {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_are_unique() {
        let ids = UuidRequestIds;
        assert_ne!(ids.next(), ids.next());
    }

    #[test]
    fn test_sequence_starts_at_zero() {
        let ids = SequenceRequestIds::new("trace-1");
        assert_eq!(ids.next(), "trace-1-0");
        assert_eq!(ids.next(), "trace-1-1");
        assert_eq!(ids.next(), "trace-1-2");
    }

    #[test]
    fn test_sequences_are_independent_per_generator() {
        let a = SequenceRequestIds::new("trace-1");
        let b = SequenceRequestIds::new("trace-2");

        // Interleaved draws must not share a counter.
        assert_eq!(a.next(), "trace-1-0");
        assert_eq!(b.next(), "trace-2-0");
        assert_eq!(a.next(), "trace-1-1");
        assert_eq!(b.next(), "trace-2-1");
    }
}
