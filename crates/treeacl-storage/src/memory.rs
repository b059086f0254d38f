//! In-memory storage implementation for testing and fixtures.
//!
//! Pages and ACL rows are kept in `DashMap`s keyed by uid. Child and
//! filter lookups are linear scans, which is fine for fixture-sized trees.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::instrument;

use crate::error::{StorageError, StorageResult};
use crate::traits::{validate_acl, validate_page, AclFilter, DataStore, StoredAcl, StoredPage};

/// In-memory implementation of DataStore.
///
/// # Performance Characteristics
///
/// - **Write page / acl**: O(1) average (DashMap insert)
/// - **Get page**: O(1)
/// - **List children / read acls**: O(N) scan plus sort of the matches
/// - **Root line**: O(depth)
#[derive(Debug, Default)]
pub struct MemoryDataStore {
    pages: DashMap<u64, StoredPage>,
    acls: DashMap<u64, StoredAcl>,
}

impl MemoryDataStore {
    /// Creates a new in-memory data store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory data store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of stored pages, deleted ones included.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of stored ACL rows.
    pub fn acl_count(&self) -> usize {
        self.acls.len()
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn write_pages(&self, pages: Vec<StoredPage>) -> StorageResult<()> {
        // Validate all pages first so a bad batch writes nothing
        for page in &pages {
            validate_page(page)?;
        }
        for page in pages {
            self.pages.insert(page.uid, page);
        }
        Ok(())
    }

    async fn get_page(&self, uid: u64) -> StorageResult<StoredPage> {
        self.pages
            .get(&uid)
            .map(|p| p.value().clone())
            .ok_or(StorageError::PageNotFound { uid })
    }

    async fn list_child_pages(&self, pid: u64) -> StorageResult<Vec<StoredPage>> {
        let mut children: Vec<StoredPage> = self
            .pages
            .iter()
            .filter(|p| p.pid == pid && !p.deleted)
            .map(|p| p.value().clone())
            .collect();

        children.sort_by(|a, b| a.sorting.cmp(&b.sorting).then_with(|| a.uid.cmp(&b.uid)));
        Ok(children)
    }

    #[instrument(skip(self))]
    async fn root_line(&self, uid: u64) -> StorageResult<Vec<StoredPage>> {
        let page = self.get_page(uid).await?;

        let mut seen = HashSet::from([uid]);
        let mut ancestors = Vec::new();
        let mut next = page.pid;

        while next != 0 {
            if !seen.insert(next) {
                return Err(StorageError::CorruptTree { uid: next });
            }
            // A dangling parent pointer ends the line like a root would
            let Some(parent) = self.pages.get(&next).map(|p| p.value().clone()) else {
                break;
            };
            next = parent.pid;
            ancestors.push(parent);
        }

        ancestors.reverse();
        Ok(ancestors)
    }

    async fn write_acls(&self, acls: Vec<StoredAcl>) -> StorageResult<()> {
        for acl in &acls {
            validate_acl(acl)?;
        }
        for acl in acls {
            self.acls.insert(acl.uid, acl);
        }
        Ok(())
    }

    async fn read_acls(&self, filter: &AclFilter) -> StorageResult<Vec<StoredAcl>> {
        // Filter first, then clone only matching rows
        let mut rows: Vec<StoredAcl> = self
            .acls
            .iter()
            .filter(|a| filter.matches(a.value()))
            .map(|a| a.value().clone())
            .collect();

        rows.sort_by_key(|a| a.uid);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_chain() -> MemoryDataStore {
        let store = MemoryDataStore::new();
        store
            .write_pages(vec![
                StoredPage::new(1, 0, "root"),
                StoredPage::new(2, 1, "a"),
                StoredPage::new(3, 2, "b"),
                StoredPage::new(4, 3, "target"),
            ])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_memory_store_can_be_created() {
        let store = MemoryDataStore::new();
        assert_eq!(store.page_count(), 0);
        assert_eq!(store.acl_count(), 0);
    }

    // Test: state is shared through the Arc
    #[tokio::test]
    async fn test_memory_store_shared() {
        let store = MemoryDataStore::new_shared();
        store
            .write_pages(vec![StoredPage::new(1, 0, "root")])
            .await
            .unwrap();

        let store2 = Arc::clone(&store);
        let page = store2.get_page(1).await.unwrap();
        assert_eq!(page.title, "root");
    }

    #[tokio::test]
    async fn test_get_nonexistent_page() {
        let store = MemoryDataStore::new();
        let result = store.get_page(42).await;
        assert!(matches!(result, Err(StorageError::PageNotFound { uid: 42 })));
    }

    #[tokio::test]
    async fn test_root_line_is_ordered_root_first_and_excludes_page() {
        let store = store_with_chain().await;

        let line: Vec<u64> = store
            .root_line(4)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.uid)
            .collect();
        assert_eq!(line, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_root_line_of_root_is_empty() {
        let store = store_with_chain().await;
        assert!(store.root_line(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_root_line_detects_parent_loop() {
        let store = MemoryDataStore::new();
        store
            .write_pages(vec![StoredPage::new(1, 2, "x"), StoredPage::new(2, 1, "y")])
            .await
            .unwrap();

        let result = store.root_line(1).await;
        assert!(matches!(result, Err(StorageError::CorruptTree { .. })));
    }

    #[tokio::test]
    async fn test_child_listing_skips_deleted_and_sorts() {
        let store = MemoryDataStore::new();
        store
            .write_pages(vec![
                StoredPage::new(1, 0, "root"),
                StoredPage::new(5, 1, "late").with_sorting(20),
                StoredPage::new(6, 1, "early").with_sorting(10),
                StoredPage::new(7, 1, "gone").with_sorting(5).deleted(),
            ])
            .await
            .unwrap();

        let children: Vec<u64> = store
            .list_child_pages(1)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.uid)
            .collect();
        assert_eq!(children, vec![6, 5]);
    }

    #[tokio::test]
    async fn test_invalid_batch_writes_nothing() {
        let store = MemoryDataStore::new();
        let result = store
            .write_pages(vec![StoredPage::new(1, 0, "ok"), StoredPage::new(0, 0, "bad")])
            .await;

        assert!(matches!(result, Err(StorageError::InvalidInput { .. })));
        assert_eq!(store.page_count(), 0);
    }

    #[tokio::test]
    async fn test_read_acls_ordered_by_uid() {
        let store = MemoryDataStore::new();
        store
            .write_acls(vec![
                StoredAcl::new(9, 1, 0, 100, 1, false),
                StoredAcl::new(3, 1, 1, 7, 16, true),
                StoredAcl::new(5, 2, 0, 100, 31, true),
            ])
            .await
            .unwrap();

        let uids: Vec<u64> = store
            .read_acls(&AclFilter::by_page(1))
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.uid)
            .collect();
        assert_eq!(uids, vec![3, 9]);
    }

    #[tokio::test]
    async fn test_read_returns_empty_when_no_match() {
        let store = MemoryDataStore::new();
        let rows = store.read_acls(&AclFilter::by_page(77)).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_write_replaces_row_with_same_uid() {
        let store = MemoryDataStore::new();
        store
            .write_acls(vec![StoredAcl::new(1, 1, 0, 100, 1, false)])
            .await
            .unwrap();
        store
            .write_acls(vec![StoredAcl::new(1, 1, 0, 100, 31, true)])
            .await
            .unwrap();

        let rows = store.read_acls(&AclFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].permissions, 31);
    }
}
