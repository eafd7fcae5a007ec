//! Round-robin node selection.

use std::sync::atomic::{AtomicUsize, Ordering};

use url::Url;

/// Rotates through the configured node URLs with an internal counter.
#[derive(Debug, Default)]
pub struct NodePool {
    nodes: Vec<Url>,
    cursor: AtomicUsize,
}

impl NodePool {
    pub fn new(nodes: Vec<Url>) -> Self {
        Self {
            nodes,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Next node in rotation, or `None` for an empty pool.
    pub fn next(&self) -> Option<Url> {
        if self.nodes.is_empty() {
            return None;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.nodes.len();
        Some(self.nodes[index].clone())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
