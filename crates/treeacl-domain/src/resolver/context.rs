//! Internal traversal state for the tree walker.

use std::sync::Arc;

use crate::model::{GrantSet, NodeId};

/// One pending node on the walker's explicit stack.
#[derive(Debug, Clone)]
pub(crate) struct WalkFrame {
    pub(crate) node_id: NodeId,
    /// Depth below the resolution root (the root is 0).
    pub(crate) depth: u32,
    /// State handed down by the parent.
    /// Wrapped in Arc so siblings share it until one of them needs a copy.
    pub(crate) inherited: Arc<GrantSet>,
}

impl WalkFrame {
    pub(crate) fn root(node_id: NodeId, seeds: GrantSet) -> Self {
        Self {
            node_id,
            depth: 0,
            inherited: Arc::new(seeds),
        }
    }

    pub(crate) fn child(&self, node_id: NodeId, inherited: Arc<GrantSet>) -> Self {
        Self {
            node_id,
            depth: self.depth + 1,
            inherited,
        }
    }
}
