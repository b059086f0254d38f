//! treeacl-server: permission views over a page tree
//!
//! This crate wires storage to the resolution domain:
//! - Layered configuration (defaults, YAML, environment)
//! - Logging initialisation
//! - Storage to domain adapters
//! - The permission overview service used by the `treeacl` binary
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               treeacl-server                │
//! ├─────────────────────────────────────────────┤
//! │  config        - ServerConfig loading       │
//! │  observability - tracing subscriber setup   │
//! │  adapters      - DataStore -> readers       │
//! │  service       - PermissionService          │
//! │  fixture       - JSON site fixtures         │
//! └─────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod fixture;
pub mod observability;
pub mod service;

pub use config::{ConfigLoadError, ServerConfig};
pub use service::{PermissionOverview, PermissionService};
