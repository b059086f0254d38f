//! Root-line seeding.
//!
//! Before a subtree is walked, the recursive entries on the target's
//! ancestors decide what the target inherits. The ancestor chain is read
//! root first and the first matching entry per principal is kept, so a
//! grant closer to the root is never replaced by one further down the
//! chain during seeding.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::DomainResult;
use crate::model::{GrantSet, NodeId, PrincipalSet, PrincipalType};

use super::traits::{AclReader, PageTreeReader};

/// Collects the inherited state a node starts with.
pub struct RootLineSeeder<A, T> {
    acl_reader: Arc<A>,
    tree_reader: Arc<T>,
}

impl<A, T> RootLineSeeder<A, T>
where
    A: AclReader,
    T: PageTreeReader,
{
    /// Creates a new seeder.
    pub fn new(acl_reader: Arc<A>, tree_reader: Arc<T>) -> Self {
        Self {
            acl_reader,
            tree_reader,
        }
    }

    /// Builds the seed state for `node_id`, restricted to `candidates`.
    ///
    /// The node's own entries are not consulted; the tree walk handles
    /// them.
    #[instrument(skip(self, candidates))]
    pub async fn seed(&self, node_id: NodeId, candidates: &PrincipalSet) -> DomainResult<GrantSet> {
        let mut seeds = GrantSet::new();
        if candidates.is_empty() {
            return Ok(seeds);
        }

        let ancestors = self.tree_reader.ancestor_chain(node_id).await?;
        for ancestor in &ancestors {
            let entries = self.acl_reader.find_recursive_by_node(*ancestor).await?;
            for entry in &entries {
                let (principal_type, object_id) = entry.principal();
                if candidates.contains(principal_type, object_id)
                    && !seeds.contains(principal_type, object_id)
                {
                    seeds.insert(principal_type, object_id, entry.grant());
                }
            }
        }

        debug!(
            ancestors = ancestors.len(),
            users = seeds.len(PrincipalType::User),
            groups = seeds.len(PrincipalType::Group),
            "seeded root line"
        );
        Ok(seeds)
    }
}
