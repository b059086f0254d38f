//! treeacl-domain: ACL inheritance resolution
//!
//! This crate contains the core ACL logic including:
//! - ACL record and resolved-state types
//! - Root-line seeding and the subtree resolver
//! - Principal catalog for filter selectors
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               treeacl-domain                │
//! ├─────────────────────────────────────────────┤
//! │  model/     - Entries, grants, node state   │
//! │  resolver/  - Seeder & tree walker          │
//! │  catalog/   - Principal catalog             │
//! └─────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod error;
pub mod model;
pub mod resolver;

// Re-export commonly used types at the crate root
pub use catalog::{PrincipalCatalog, PrincipalOption};
pub use error::{DomainError, DomainResult};
pub use resolver::{AclTreeResolver, ResolvedTree, ResolverConfig};
