//! Permission overview service.
//!
//! Wires storage adapters, the principal catalogs and the subtree resolver
//! into the two read views of a page: the inherited ACL overview of its
//! subtree and the raw entries attached to the page itself.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use treeacl_domain::catalog::{candidates_of, PrincipalCatalog};
use treeacl_domain::error::{DomainError, DomainResult};
use treeacl_domain::model::{AclEntry, NodeId, ObjectId, PrincipalSet, PrincipalType};
use treeacl_domain::resolver::{AclReader, AclTreeResolver, PageTreeReader, ResolvedTree};
use treeacl_storage::DataStore;

use crate::adapters::{DataStoreAclReader, DataStorePageTree};
use crate::config::ServerConfig;

/// Everything needed to render the permission view of one page.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionOverview {
    pub page: NodeId,
    pub users: PrincipalCatalog,
    pub groups: PrincipalCatalog,
    /// Users to display, after the filter selector is applied.
    pub visible_users: Vec<ObjectId>,
    /// Groups to display, after the filter selector is applied.
    pub visible_groups: Vec<ObjectId>,
    pub acl_tree: ResolvedTree,
}

/// Read-side permission service over one data store.
pub struct PermissionService<S: DataStore> {
    acl_reader: Arc<DataStoreAclReader<S>>,
    tree_reader: Arc<DataStorePageTree<S>>,
    resolver: AclTreeResolver<DataStoreAclReader<S>, DataStorePageTree<S>>,
    enable_filter_selector: bool,
}

impl<S: DataStore> PermissionService<S> {
    /// Creates a service using the `acl` section of `config`.
    pub fn new(storage: Arc<S>, config: &ServerConfig) -> Self {
        let resolver_config = config.resolver_config();
        let acl_reader = Arc::new(DataStoreAclReader::with_policy(
            Arc::clone(&storage),
            resolver_config.malformed_entries,
        ));
        let tree_reader = Arc::new(DataStorePageTree::new(storage));
        let resolver = AclTreeResolver::with_config(
            Arc::clone(&acl_reader),
            Arc::clone(&tree_reader),
            resolver_config,
        );

        Self {
            acl_reader,
            tree_reader,
            resolver,
            enable_filter_selector: config.acl.enable_filter_selector,
        }
    }

    /// Builds the permission overview of `page` and its subtree.
    ///
    /// The tree is resolved for every principal that has an ACL somewhere;
    /// `selection` only decides which of them are visible and selected.
    /// With the filter selector disabled the selection is ignored.
    #[instrument(skip(self, selection))]
    pub async fn overview(
        &self,
        page: NodeId,
        selection: &PrincipalSet,
    ) -> DomainResult<PermissionOverview> {
        self.ensure_exists(page).await?;

        let no_selection = PrincipalSet::default();
        let selection = if self.enable_filter_selector {
            selection
        } else {
            &no_selection
        };

        let reader = self.acl_reader.as_ref();
        let users = PrincipalCatalog::load(reader, PrincipalType::User, selection).await?;
        let groups = PrincipalCatalog::load(reader, PrincipalType::Group, selection).await?;

        let candidates = candidates_of(&users, &groups);
        let acl_tree = self.resolver.resolve_for_subtree(page, &candidates).await?;

        let visible_users = visible_ids(&users, self.enable_filter_selector);
        let visible_groups = visible_ids(&groups, self.enable_filter_selector);

        info!(
            page,
            nodes = acl_tree.len(),
            users = users.len(),
            groups = groups.len(),
            "built permission overview"
        );

        Ok(PermissionOverview {
            page,
            users,
            groups,
            visible_users,
            visible_groups,
            acl_tree,
        })
    }

    /// Raw entries attached to `page`, in storage order.
    pub async fn page_acls(&self, page: NodeId) -> DomainResult<Vec<AclEntry>> {
        self.ensure_exists(page).await?;
        self.acl_reader.find_by_node(page).await
    }

    async fn ensure_exists(&self, page: NodeId) -> DomainResult<()> {
        if self.tree_reader.node_exists(page).await? {
            Ok(())
        } else {
            Err(DomainError::InvalidNode { node_id: page })
        }
    }
}

fn visible_ids(catalog: &PrincipalCatalog, filter_enabled: bool) -> Vec<ObjectId> {
    catalog
        .visible(filter_enabled)
        .into_iter()
        .map(|o| o.object_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use treeacl_storage::{MemoryDataStore, StoredAcl, StoredPage};

    async fn site() -> Arc<MemoryDataStore> {
        let store = MemoryDataStore::new_shared();
        store
            .write_pages(vec![
                StoredPage::new(1, 0, "Home"),
                StoredPage::new(2, 1, "News"),
                StoredPage::new(3, 2, "Archive"),
            ])
            .await
            .unwrap();
        store
            .write_acls(vec![
                StoredAcl::new(1, 1, 0, 100, 7, true),
                StoredAcl::new(2, 1, 1, 5, 1, true),
                StoredAcl::new(3, 2, 0, 101, 3, false),
            ])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_overview_seeds_from_root_line() {
        let service = PermissionService::new(site().await, &ServerConfig::default());

        let overview = service
            .overview(2, &PrincipalSet::default())
            .await
            .unwrap();

        assert_eq!(overview.users.candidates(), vec![100, 101]);
        assert_eq!(overview.groups.candidates(), vec![5]);

        let news = overview.acl_tree.get(2).unwrap();
        assert_eq!(news.permissions(PrincipalType::User, 100), Some(7));
        assert_eq!(news.permissions(PrincipalType::User, 101), Some(3));
        assert_eq!(news.permissions(PrincipalType::Group, 5), Some(1));

        let archive = overview.acl_tree.get(3).unwrap();
        assert_eq!(archive.permissions(PrincipalType::User, 101), None);
        assert_eq!(archive.permissions(PrincipalType::User, 100), Some(7));
    }

    #[tokio::test]
    async fn test_filter_selector_limits_visible_principals() {
        let mut config = ServerConfig::default();
        config.acl.enable_filter_selector = true;
        let service = PermissionService::new(site().await, &config);

        let selection = PrincipalSet::new([101], []);
        let overview = service.overview(1, &selection).await.unwrap();

        assert_eq!(overview.visible_users, vec![101]);
        assert!(overview.visible_groups.is_empty());
        // Resolution still covers every known principal
        let home = overview.acl_tree.get(1).unwrap();
        assert_eq!(home.permissions(PrincipalType::User, 100), Some(7));
    }

    #[tokio::test]
    async fn test_filter_selector_disabled_shows_all() {
        let service = PermissionService::new(site().await, &ServerConfig::default());

        let selection = PrincipalSet::new([101], []);
        let overview = service.overview(1, &selection).await.unwrap();

        assert_eq!(overview.visible_users, vec![100, 101]);
        assert_eq!(overview.visible_groups, vec![5]);
        assert!(overview.users.options().iter().all(|o| !o.selected));
    }

    #[tokio::test]
    async fn test_page_acls_lists_local_entries() {
        let service = PermissionService::new(site().await, &ServerConfig::default());

        let entries = service.page_acls(1).await.unwrap();
        assert_eq!(entries.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(service.page_acls(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_page_is_rejected() {
        let service = PermissionService::new(site().await, &ServerConfig::default());

        let err = service
            .overview(42, &PrincipalSet::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidNode { node_id: 42 }));

        let err = service.page_acls(42).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidNode { node_id: 42 }));
    }
}
