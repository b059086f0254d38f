//! treeacl-storage: Storage abstraction layer
//!
//! This crate provides the storage abstraction for treeacl, including:
//! - DataStore trait for page tree and ACL row access
//! - In-memory implementation for tests and fixtures
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              treeacl-storage                │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs   - DataStore trait & raw rows   │
//! │  memory.rs   - In-memory implementation     │
//! │  error.rs    - StorageError                 │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryDataStore;
pub use traits::{AclFilter, DataStore, StoredAcl, StoredPage};
