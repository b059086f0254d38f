//! Types for the ACL tree resolver.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{EffectiveAclState, GrantSet, NodeId};

/// The resolved ACL state of every node in one subtree.
///
/// Produced fresh by each resolution run and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTree {
    root: NodeId,
    seeds: GrantSet,
    nodes: BTreeMap<NodeId, EffectiveAclState>,
    /// Node ids in the order they were resolved (pre-order).
    order: Vec<NodeId>,
}

impl ResolvedTree {
    pub(crate) fn new(
        root: NodeId,
        seeds: GrantSet,
        nodes: BTreeMap<NodeId, EffectiveAclState>,
        order: Vec<NodeId>,
    ) -> Self {
        Self {
            root,
            seeds,
            nodes,
            order,
        }
    }

    /// The node the resolution started at.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The inherited state the root was resolved with.
    pub fn seeds(&self) -> &GrantSet {
        &self.seeds
    }

    /// Effective state of one node, if it was resolved.
    pub fn get(&self, node_id: NodeId) -> Option<&EffectiveAclState> {
        self.nodes.get(&node_id)
    }

    /// Whether the node is part of the resolved subtree.
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Number of resolved nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node was resolved.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in pre-order: every node appears after its parent.
    pub fn visit_order(&self) -> &[NodeId] {
        &self.order
    }

    /// Iterates over resolved nodes ordered by node id.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &EffectiveAclState)> {
        self.nodes.iter().map(|(id, state)| (*id, state))
    }
}
