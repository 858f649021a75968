//! Arena-based MCTS tree with a transposition index.
//!
//! Nodes live in a flat `Vec<MCTSNode>` and are referenced by `NodeId`.
//! A separate `FxHashMap<StateKey, NodeId>` finds the node for a position,
//! so a position reached through different move orders at the same move
//! count shares one node.

use rustc_hash::FxHashMap;

use super::node::{MCTSNode, NodeId};
use crate::core::StateKey;

/// Arena of expanded nodes plus the key index.
#[derive(Clone, Debug, Default)]
pub struct MCTSTree {
    /// All nodes in the tree.
    nodes: Vec<MCTSNode>,

    /// Position key to node.
    index: FxHashMap<StateKey, NodeId>,
}

impl MCTSTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree with custom initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Node already expanded for `key`, if any.
    #[inline]
    #[must_use]
    pub fn lookup(&self, key: &StateKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Store a freshly expanded node under `key`.
    ///
    /// A key that is already present keeps its existing node.
    pub fn insert(&mut self, key: StateKey, node: MCTSNode) -> NodeId {
        if let Some(id) = self.lookup(&key) {
            return id;
        }
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        self.index.insert(key, id);
        id
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let leaf_count = self.nodes.iter().filter(|n| n.is_leaf()).count();
        let total_edges: usize = self.nodes.iter().map(|n| n.edges.len()).sum();
        let expanded_edges: usize = self
            .nodes
            .iter()
            .flat_map(|n| n.edges.iter())
            .filter(|e| e.is_expanded())
            .count();

        TreeStats {
            node_count: self.nodes.len(),
            leaf_count,
            total_edges,
            expanded_edges,
        }
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Nodes without legal actions.
    pub leaf_count: usize,

    /// Total number of edges (actions).
    pub total_edges: usize,

    /// Number of edges linked to a child.
    pub expanded_edges: usize,
}

impl TreeStats {
    /// Get the branching factor (average edges per node).
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.node_count == 0 {
            0.0
        } else {
            self.total_edges as f64 / self.node_count as f64
        }
    }

    /// Get the expansion ratio (expanded edges / total edges).
    #[must_use]
    pub fn expansion_ratio(&self) -> f64 {
        if self.total_edges == 0 {
            0.0
        } else {
            self.expanded_edges as f64 / self.total_edges as f64
        }
    }
}
