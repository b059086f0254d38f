//! ACL inheritance resolver for page subtrees.
//!
//! # Architecture Decisions
//!
//! - **Explicit work-list**: the subtree is walked depth-first in
//!   pre-order with a `Vec` stack instead of recursion, so tree depth
//!   never consumes call-stack frames.
//!
//! - **Inherited state by value**: each node starts from its own copy of
//!   the parent's outgoing state. Siblings share one `Arc<GrantSet>` and
//!   the copy happens in `merge_node_entries`.
//!
//! - **Two states per node**: a node's own effective state and the state
//!   it hands to its children diverge whenever a non-recursive entry
//!   masks a recursive one locally. Children always receive the
//!   recursive grant.
//!
//! - **Depth limiting / cycle guard / timeout**: a misbehaving tree
//!   provider fails the run with `DepthLimitExceeded`, `CycleDetected`
//!   or `Timeout` instead of hanging.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, instrument, trace};

use crate::error::{DomainError, DomainResult};
use crate::model::{
    AclEntry, AclGrant, AclMeta, EffectiveAclState, GrantSet, NodeId, ObjectId, PrincipalSet,
    PrincipalType,
};

use super::config::ResolverConfig;
use super::context::WalkFrame;
use super::seeder::RootLineSeeder;
use super::traits::{AclReader, PageTreeReader};
use super::types::ResolvedTree;

/// Result of applying one node's own entries to its inherited state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeResolution {
    /// The node's effective state, with metadata.
    pub(crate) state: EffectiveAclState,
    /// State for the node's children. `None` when the node has no
    /// recursive entries and children inherit exactly what it inherited.
    pub(crate) outgoing: Option<GrantSet>,
}

/// Applies a node's raw entries, in storage order, to the state it
/// inherited from its parent.
///
/// - A non-recursive entry sets the node's own grant and masks any
///   recursive entry for the same principal at this node.
/// - A recursive entry always replaces the grant handed to children.
///   It becomes the node's own grant unless masked.
/// - Every raw entry counts towards `direct_count` for its type.
pub(crate) fn merge_node_entries(inherited: &GrantSet, entries: &[AclEntry]) -> NodeResolution {
    let mut own = inherited.clone();
    let mut outgoing: Option<GrantSet> = None;
    let mut non_recursive: HashMap<(PrincipalType, ObjectId), AclGrant> = HashMap::new();

    let mut meta = AclMeta::default();
    for principal_type in PrincipalType::ALL {
        meta.get_mut(principal_type).inherited_count = inherited.len(principal_type);
    }

    for entry in entries {
        let (principal_type, object_id) = entry.principal();
        let grant = entry.grant();

        if entry.recursive {
            outgoing
                .get_or_insert_with(|| inherited.clone())
                .insert(principal_type, object_id, grant);

            let winner = non_recursive
                .get(&(principal_type, object_id))
                .copied()
                .unwrap_or(grant);
            own.insert(principal_type, object_id, winner);
        } else {
            own.insert(principal_type, object_id, grant);
            non_recursive.insert((principal_type, object_id), grant);
        }

        meta.get_mut(principal_type).direct_count += 1;
    }

    NodeResolution {
        state: EffectiveAclState {
            by_principal: own,
            meta,
        },
        outgoing,
    }
}

/// Milliseconds in `duration`, capped at `u64::MAX`.
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Resolves effective ACLs for every node of a subtree.
///
/// Each call to [`resolve_for_subtree`](Self::resolve_for_subtree) owns
/// its own result mapping; the resolver itself holds no per-run state and
/// can be shared between concurrent callers.
pub struct AclTreeResolver<A, T> {
    acl_reader: Arc<A>,
    tree_reader: Arc<T>,
    config: ResolverConfig,
}

impl<A, T> AclTreeResolver<A, T>
where
    A: AclReader + 'static,
    T: PageTreeReader + 'static,
{
    /// Creates a new resolver.
    pub fn new(acl_reader: Arc<A>, tree_reader: Arc<T>) -> Self {
        Self::with_config(acl_reader, tree_reader, ResolverConfig::default())
    }

    /// Creates a new resolver with custom configuration.
    pub fn with_config(acl_reader: Arc<A>, tree_reader: Arc<T>, config: ResolverConfig) -> Self {
        Self {
            acl_reader,
            tree_reader,
            config,
        }
    }

    /// Returns the resolver configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The seeder used for the root line of each run.
    pub fn seeder(&self) -> RootLineSeeder<A, T> {
        RootLineSeeder::new(Arc::clone(&self.acl_reader), Arc::clone(&self.tree_reader))
    }

    /// Resolves the effective ACL state of `root` and all its descendants.
    ///
    /// `candidates` restricts which principals may be seeded from the
    /// root line. Entries on `root` and below apply regardless.
    ///
    /// Fails with `InvalidNode` before any traversal when `root` does not
    /// exist. Any repository error aborts the run; no partial result is
    /// returned.
    pub async fn resolve_for_subtree(
        &self,
        root: NodeId,
        candidates: &PrincipalSet,
    ) -> DomainResult<ResolvedTree> {
        match timeout(self.config.timeout, self.resolve_inner(root, candidates)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::Timeout {
                duration_ms: saturating_millis(self.config.timeout),
            }),
        }
    }

    #[instrument(skip(self, candidates))]
    async fn resolve_inner(
        &self,
        root: NodeId,
        candidates: &PrincipalSet,
    ) -> DomainResult<ResolvedTree> {
        if !self.tree_reader.node_exists(root).await? {
            return Err(DomainError::InvalidNode { node_id: root });
        }

        let seeds = self.seeder().seed(root, candidates).await?;
        let (nodes, order) = self.walk(root, seeds.clone()).await?;

        debug!(nodes = nodes.len(), "resolved acl subtree");
        Ok(ResolvedTree::new(root, seeds, nodes, order))
    }

    /// Depth-first pre-order walk starting at `root` with `seeds` as its
    /// inherited state.
    async fn walk(
        &self,
        root: NodeId,
        seeds: GrantSet,
    ) -> DomainResult<(BTreeMap<NodeId, EffectiveAclState>, Vec<NodeId>)> {
        let mut results = BTreeMap::new();
        let mut order = Vec::new();
        let mut stack = vec![WalkFrame::root(root, seeds)];

        while let Some(frame) = stack.pop() {
            if frame.depth >= self.config.max_depth {
                return Err(DomainError::DepthLimitExceeded {
                    max_depth: self.config.max_depth,
                });
            }
            if results.contains_key(&frame.node_id) {
                return Err(DomainError::CycleDetected {
                    node_id: frame.node_id,
                });
            }

            let entries = self.acl_reader.find_by_node(frame.node_id).await?;
            let NodeResolution { state, outgoing } = merge_node_entries(&frame.inherited, &entries);
            trace!(
                node_id = frame.node_id,
                depth = frame.depth,
                entries = entries.len(),
                "resolved node"
            );

            results.insert(frame.node_id, state);
            order.push(frame.node_id);

            let outgoing = match outgoing {
                Some(grants) => Arc::new(grants),
                None => Arc::clone(&frame.inherited),
            };

            // Reversed so the first child is popped next
            let children = self.tree_reader.children(frame.node_id).await?;
            for child in children.into_iter().rev() {
                stack.push(frame.child(child, Arc::clone(&outgoing)));
            }
        }

        Ok((results, order))
    }
}
