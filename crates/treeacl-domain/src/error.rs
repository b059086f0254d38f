//! Domain error types for ACL resolution.

use thiserror::Error;

use crate::model::{AclId, NodeId};

/// Domain-specific errors for ACL resolution.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The underlying repository failed. Fatal to the resolution run.
    #[error("repository error: {message}")]
    Repository { message: String },

    /// The requested node does not exist in the page tree.
    #[error("invalid node: {node_id}")]
    InvalidNode { node_id: NodeId },

    /// A stored ACL row carries a principal type outside the known set.
    #[error("malformed acl entry {acl_id}: unknown principal type {principal_type}")]
    MalformedEntry { acl_id: AclId, principal_type: i64 },

    /// Depth limit exceeded during tree traversal.
    #[error("depth limit exceeded (max: {max_depth})")]
    DepthLimitExceeded { max_depth: u32 },

    /// A node was reached twice in one traversal.
    #[error("cycle detected in page tree at node {node_id}")]
    CycleDetected { node_id: NodeId },

    /// Timeout during resolution.
    #[error("timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
