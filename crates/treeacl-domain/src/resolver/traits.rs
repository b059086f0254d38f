//! Traits for storage operations needed by the resolver.

use async_trait::async_trait;

use crate::error::DomainResult;
use crate::model::{AclEntry, NodeId, PrincipalType};

/// Read access to ACL records.
///
/// Every method returns entries in storage order and an empty vector
/// when nothing matches.
#[async_trait]
pub trait AclReader: Send + Sync {
    /// Entries attached to the given node.
    async fn find_by_node(&self, node_id: NodeId) -> DomainResult<Vec<AclEntry>>;

    /// Entries of one principal type, on any node.
    async fn find_by_type(&self, principal_type: PrincipalType) -> DomainResult<Vec<AclEntry>>;

    /// Recursive entries attached to the given node.
    ///
    /// Default implementation filters `find_by_node`. Override when the
    /// backend can filter on its own.
    async fn find_recursive_by_node(&self, node_id: NodeId) -> DomainResult<Vec<AclEntry>> {
        let entries = self.find_by_node(node_id).await?;
        Ok(entries.into_iter().filter(|e| e.recursive).collect())
    }
}

/// Read access to the page tree.
#[async_trait]
pub trait PageTreeReader: Send + Sync {
    /// Checks if a node exists.
    async fn node_exists(&self, node_id: NodeId) -> DomainResult<bool>;

    /// Ancestors of a node ordered from the tree root down to its
    /// immediate parent.
    async fn ancestor_chain(&self, node_id: NodeId) -> DomainResult<Vec<NodeId>>;

    /// Children of a node, soft-deleted ones excluded.
    async fn children(&self, node_id: NodeId) -> DomainResult<Vec<NodeId>>;
}
