//! Storage Integration Tests.
//!
//! These tests drive the in-memory store through the `DataStore` trait
//! object the way the server wires it, including concurrent readers.

use std::sync::Arc;

use treeacl_storage::{AclFilter, DataStore, MemoryDataStore, StoredAcl, StoredPage};

/// Builds a small site: 1 -> {2 -> {4, 5(deleted)}, 3}.
async fn create_site() -> Arc<dyn DataStore> {
    let store: Arc<dyn DataStore> = Arc::new(MemoryDataStore::new());
    store
        .write_pages(vec![
            StoredPage::new(1, 0, "home"),
            StoredPage::new(2, 1, "products").with_sorting(1),
            StoredPage::new(3, 1, "about").with_sorting(2),
            StoredPage::new(4, 2, "widgets"),
            StoredPage::new(5, 2, "retired").deleted(),
        ])
        .await
        .unwrap();
    store
        .write_acls(vec![
            StoredAcl::new(10, 1, 0, 100, 31, true),
            StoredAcl::new(11, 2, 0, 100, 1, false),
            StoredAcl::new(12, 2, 1, 7, 16, true),
            StoredAcl::new(13, 4, 1, 8, 2, false),
        ])
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_trait_object_reads_tree_shape() {
    let store = create_site().await;

    let children: Vec<u64> = store
        .list_child_pages(2)
        .await
        .unwrap()
        .iter()
        .map(|p| p.uid)
        .collect();
    assert_eq!(children, vec![4], "deleted page 5 must be hidden");

    let line: Vec<u64> = store
        .root_line(4)
        .await
        .unwrap()
        .iter()
        .map(|p| p.uid)
        .collect();
    assert_eq!(line, vec![1, 2]);

    // Deleted pages are still addressable directly.
    assert!(store.get_page(5).await.unwrap().deleted);
}

#[tokio::test]
async fn test_filters_compose() {
    let store = create_site().await;

    let recursive_on_two = store
        .read_acls(&AclFilter::recursive_on_page(2))
        .await
        .unwrap();
    assert_eq!(recursive_on_two.len(), 1);
    assert_eq!(recursive_on_two[0].uid, 12);

    let groups = store.read_acls(&AclFilter::by_type(1)).await.unwrap();
    let uids: Vec<u64> = groups.iter().map(|a| a.uid).collect();
    assert_eq!(uids, vec![12, 13]);
}

#[tokio::test]
async fn test_concurrent_reads_while_writing() {
    let store = create_site().await;

    let mut handles = Vec::new();
    for i in 0..8u64 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .write_acls(vec![StoredAcl::new(100 + i, 3, 0, 200 + i, 1, false)])
                .await
                .unwrap();
            store.read_acls(&AclFilter::by_page(1)).await.unwrap().len()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), 1);
    }

    let on_three = store.read_acls(&AclFilter::by_page(3)).await.unwrap();
    assert_eq!(on_three.len(), 8);
}
