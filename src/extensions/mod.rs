//! Namespaced client extensions.
//!
//! # Responsibilities
//! - Map dotted names (`"utility.index"`) to factory-produced behaviors
//! - Create intermediate namespace nodes on demand
//! - Snapshot the namespace tree when a child client is derived
//!
//! # Design Decisions
//! - The namespace is a tagged tree keyed by path segment, resolved via
//!   explicit lookup with a typed not-found error, never a silent no-op
//! - A snapshot is a structural copy: maps are copied, behaviors stay
//!   shared via `Arc`. After the copy, registrations on either side are
//!   invisible to the other

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use crate::error::ClientError;

/// Future returned by invoking an extension behavior.
pub type ExtensionFuture = BoxFuture<'static, Result<Value, ClientError>>;

/// A realized extension behavior: the value a factory returned when the
/// extension was registered.
pub type Extension = Arc<dyn Fn(Value) -> ExtensionFuture + Send + Sync>;

/// Errors raised by extension registration and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    /// No behavior is registered at the path.
    #[error("no extension registered at `{path}`")]
    NotRegistered { path: String },

    /// The path names a namespace node, not a callable behavior.
    #[error("`{path}` is a namespace, not a callable extension")]
    NotCallable { path: String },

    /// The path (or one of its prefixes) is already taken by a behavior.
    #[error("an extension is already registered at `{path}`")]
    AlreadyRegistered { path: String },

    /// The path is empty or contains an empty segment.
    #[error("invalid extension path `{path}`")]
    InvalidPath { path: String },
}

#[derive(Clone)]
enum NamespaceNode {
    Namespace(HashMap<String, NamespaceNode>),
    Behavior(Extension),
}

/// Per-instance registry of namespaced behaviors.
///
/// Registrations are scoped to the instance that made them and to any child
/// derived *after* the call; ancestors, siblings, and previously-derived
/// children never observe them.
#[derive(Default, Clone)]
pub struct ExtensionRegistry {
    root: HashMap<String, NamespaceNode>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a behavior at a dotted path, creating intermediate namespaces
    /// as needed.
    pub fn register(&mut self, path: &str, behavior: Extension) -> Result<(), ExtensionError> {
        let segments = split_path(path)?;
        let (leaf, parents) = match segments.split_last() {
            Some(split) => split,
            None => {
                return Err(ExtensionError::InvalidPath { path: path.into() });
            }
        };

        let mut current = &mut self.root;
        let mut walked = Vec::new();
        for segment in parents {
            walked.push(segment.as_str());
            current = match current
                .entry(segment.clone())
                .or_insert_with(|| NamespaceNode::Namespace(HashMap::new()))
            {
                NamespaceNode::Namespace(children) => children,
                NamespaceNode::Behavior(_) => {
                    return Err(ExtensionError::AlreadyRegistered {
                        path: walked.join("."),
                    });
                }
            };
        }

        if current.contains_key(leaf) {
            return Err(ExtensionError::AlreadyRegistered { path: path.into() });
        }
        current.insert(leaf.clone(), NamespaceNode::Behavior(behavior));
        Ok(())
    }

    /// Resolve a dotted path to its behavior.
    pub fn lookup(&self, path: &str) -> Result<Extension, ExtensionError> {
        let segments = split_path(path)?;
        let mut current = &self.root;
        for (i, segment) in segments.iter().enumerate() {
            match current.get(segment) {
                None => {
                    return Err(ExtensionError::NotRegistered { path: path.into() });
                }
                Some(NamespaceNode::Namespace(children)) => {
                    if i == segments.len() - 1 {
                        return Err(ExtensionError::NotCallable { path: path.into() });
                    }
                    current = children;
                }
                Some(NamespaceNode::Behavior(behavior)) => {
                    if i == segments.len() - 1 {
                        return Ok(Arc::clone(behavior));
                    }
                    // A path below a leaf does not exist.
                    return Err(ExtensionError::NotRegistered { path: path.into() });
                }
            }
        }
        Err(ExtensionError::NotRegistered { path: path.into() })
    }

    /// Structural copy of the namespace tree for a newly derived child.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Number of registered behaviors across all namespaces.
    pub fn len(&self) -> usize {
        fn count(nodes: &HashMap<String, NamespaceNode>) -> usize {
            nodes
                .values()
                .map(|node| match node {
                    NamespaceNode::Behavior(_) => 1,
                    NamespaceNode::Namespace(children) => count(children),
                })
                .sum()
        }
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("behaviors", &self.len())
            .finish()
    }
}

fn split_path(path: &str) -> Result<Vec<String>, ExtensionError> {
    if path.is_empty() {
        return Err(ExtensionError::InvalidPath { path: path.into() });
    }
    let segments: Vec<String> = path.split('.').map(str::to_string).collect();
    if segments.iter().any(String::is_empty) {
        return Err(ExtensionError::InvalidPath { path: path.into() });
    }
    Ok(segments)
}
