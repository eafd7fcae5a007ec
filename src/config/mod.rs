//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! programmatic construction or config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable, shared via Arc)
//!
//! On child derivation:
//!     resolver.rs merges the parent's resolved config with the override set
//!     → new ClientConfig for the child
//!     → parent's config is never mutated
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved; a child gets its own merged copy
//! - All fields have defaults so minimal configs (and empty overrides) work
//! - Override merge is whole-value per field: headers and auth replace, never
//!   merge key-by-key
//! - Unknown file keys are ignored for forward compatibility

pub mod loader;
pub mod resolver;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use resolver::{resolve, ConfigOverrides};
pub use schema::{Auth, ClientConfig};
pub use validation::{validate_config, ValidationError};
