//! Adapters that bridge the storage layer to the domain layer.
//!
//! The domain layer (treeacl-domain) defines abstract traits for data access:
//! - `AclReader`: Read ACL entries by node or principal type
//! - `PageTreeReader`: Walk the page tree
//!
//! The storage layer (treeacl-storage) implements `DataStore` with raw rows.
//! Raw principal types are validated here, under the configured
//! [`MalformedEntryPolicy`].

use std::sync::Arc;

use async_trait::async_trait;

use treeacl_domain::error::{DomainError, DomainResult};
use treeacl_domain::model::{AclEntry, NodeId, PrincipalType};
use treeacl_domain::resolver::{AclReader, MalformedEntryPolicy, PageTreeReader};
use treeacl_storage::{AclFilter, DataStore, StorageError, StoredAcl};

fn storage_error(e: StorageError) -> DomainError {
    DomainError::Repository {
        message: format!("storage error: {}", e),
    }
}

/// Adapter that implements `AclReader` using a `DataStore`.
pub struct DataStoreAclReader<S: DataStore> {
    storage: Arc<S>,
    policy: MalformedEntryPolicy,
}

impl<S: DataStore> DataStoreAclReader<S> {
    /// Creates a new adapter wrapping the given storage.
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_policy(storage, MalformedEntryPolicy::default())
    }

    /// Creates a new adapter with an explicit malformed-row policy.
    pub fn with_policy(storage: Arc<S>, policy: MalformedEntryPolicy) -> Self {
        Self { storage, policy }
    }

    async fn read(&self, filter: AclFilter) -> DomainResult<Vec<AclEntry>> {
        let rows = self
            .storage
            .read_acls(&filter)
            .await
            .map_err(storage_error)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(entry) = self.policy.apply(to_entry(row))? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

fn to_entry(row: StoredAcl) -> DomainResult<AclEntry> {
    AclEntry::from_raw(
        row.uid,
        row.pid,
        row.principal_type,
        row.object_id,
        row.permissions,
        row.recursive,
    )
}

#[async_trait]
impl<S: DataStore> AclReader for DataStoreAclReader<S> {
    async fn find_by_node(&self, node_id: NodeId) -> DomainResult<Vec<AclEntry>> {
        self.read(AclFilter::by_page(node_id)).await
    }

    async fn find_by_type(&self, principal_type: PrincipalType) -> DomainResult<Vec<AclEntry>> {
        self.read(AclFilter::by_type(principal_type.as_raw())).await
    }

    async fn find_recursive_by_node(&self, node_id: NodeId) -> DomainResult<Vec<AclEntry>> {
        self.read(AclFilter::recursive_on_page(node_id)).await
    }
}

/// Adapter that implements `PageTreeReader` using a `DataStore`.
pub struct DataStorePageTree<S: DataStore> {
    storage: Arc<S>,
}

impl<S: DataStore> DataStorePageTree<S> {
    /// Creates a new adapter wrapping the given storage.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: DataStore> PageTreeReader for DataStorePageTree<S> {
    async fn node_exists(&self, node_id: NodeId) -> DomainResult<bool> {
        match self.storage.get_page(node_id).await {
            Ok(page) => Ok(!page.deleted),
            Err(StorageError::PageNotFound { .. }) => Ok(false),
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn ancestor_chain(&self, node_id: NodeId) -> DomainResult<Vec<NodeId>> {
        let line = self
            .storage
            .root_line(node_id)
            .await
            .map_err(storage_error)?;
        Ok(line.into_iter().map(|p| p.uid).collect())
    }

    async fn children(&self, node_id: NodeId) -> DomainResult<Vec<NodeId>> {
        let children = self
            .storage
            .list_child_pages(node_id)
            .await
            .map_err(storage_error)?;
        Ok(children.into_iter().map(|p| p.uid).collect())
    }
}
