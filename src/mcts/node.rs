//! MCTS node and edge structures.
//!
//! Uses arena-based allocation with index references (NodeId) for efficiency
//! and serializability. A node's edges are fixed at expansion: one per legal
//! action, in legal-action order.

use serde::{Deserialize, Serialize};

use crate::core::{Action, Player};

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// Statistics of one legal action at a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// The action this edge represents, in true board coordinates.
    pub action: Action,

    /// Child node, NONE until the edge is first followed to a
    /// non-terminal position.
    pub child: NodeId,

    /// Visit count N.
    pub visits: u32,

    /// Cumulative backed-up value W, from the node's mover's view.
    pub total_value: f32,

    /// Prior probability P from the oracle (root noise mixed in place).
    pub prior: f32,
}

impl Edge {
    /// Create an unvisited edge.
    #[must_use]
    pub fn new(action: Action, prior: f32) -> Self {
        Self {
            action,
            child: NodeId::NONE,
            visits: 0,
            total_value: 0.0,
            prior,
        }
    }

    /// Mean value Q = W / N, 0 when unvisited.
    #[inline]
    #[must_use]
    pub fn mean_value(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / self.visits as f32
        }
    }

    /// Check if a child node has been linked.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        !self.child.is_none()
    }
}

/// An expanded position in the MCTS tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSNode {
    /// Player to move at this node.
    pub to_move: Player,

    /// Sum of edge visits.
    pub visits: u32,

    /// Oracle value at expansion, from `to_move`'s view.
    pub value: f32,

    /// One edge per legal action. Empty when the position has none.
    pub edges: Vec<Edge>,
}

impl MCTSNode {
    /// Create a node with the given edges.
    #[must_use]
    pub fn new(to_move: Player, value: f32, edges: Vec<Edge>) -> Self {
        Self {
            to_move,
            visits: 0,
            value,
            edges,
        }
    }

    /// Whether the node has no legal action.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.edges.is_empty()
    }

    /// Record one visit of `edge_idx` with `value` from this node's view.
    pub fn record(&mut self, edge_idx: usize, value: f32) {
        let edge = &mut self.edges[edge_idx];
        edge.visits += 1;
        edge.total_value += value;
        self.visits += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(code: u32) -> Action {
        Action::try_from_code(code).unwrap()
    }

    #[test]
    fn test_node_id() {
        let id = NodeId::new(5);
        assert_eq!(id, NodeId(5));
        assert!(!id.is_none());
        assert_eq!(format!("{}", id), "NodeId(5)");

        assert!(NodeId::NONE.is_none());
        assert_eq!(format!("{}", NodeId::NONE), "NodeId(NONE)");
    }

    #[test]
    fn test_edge_new() {
        let edge = Edge::new(action(10), 0.5);

        assert_eq!(edge.visits, 0);
        assert!(edge.child.is_none());
        assert!(!edge.is_expanded());
        assert_eq!(edge.prior, 0.5);
        assert_eq!(edge.mean_value(), 0.0);
    }

    #[test]
    fn test_record_and_mean_value() {
        let mut node = MCTSNode::new(Player::One, 0.1, vec![Edge::new(action(1), 1.0)]);

        node.record(0, 1.0);
        node.record(0, -0.5);
        node.record(0, 1.0);

        assert_eq!(node.visits, 3);
        assert_eq!(node.edges[0].visits, 3);
        assert!((node.edges[0].mean_value() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_leaf_node() {
        let node = MCTSNode::new(Player::One, 0.0, Vec::new());
        assert!(node.is_leaf());
        assert_eq!(node.visits, 0);
    }

    #[test]
    fn test_serialization() {
        let mut node = MCTSNode::new(Player::Two, -0.25, vec![Edge::new(action(5), 1.0)]);
        node.record(0, 1.0);

        let json = serde_json::to_string(&node).unwrap();
        let deserialized: MCTSNode = serde_json::from_str(&json).unwrap();

        assert_eq!(node, deserialized);
    }
}
