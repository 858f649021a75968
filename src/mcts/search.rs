//! Core MCTS search algorithm.
//!
//! AlphaZero-style PUCT search with an injected oracle:
//!
//! 1. **Select**: from the root, follow `SelectionPolicy` through expanded
//!    nodes, applying each chosen action to a clone of the root board.
//! 2. **Evaluate**: stop at a finished game (exact value), at a position
//!    without legal actions (value 0), or at a position not yet in the
//!    tree, which is expanded with one oracle call (oracle value).
//! 3. **Backup**: walk the recorded path backwards, negating the value once
//!    per ply.
//!
//! The walk is an explicit loop over a path stack, so depth is bounded by
//! memory only. The tree persists across `search` calls until `clear`.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::core::{Action, Board, GameRng};
use crate::nn::{ContrastEncoder, Oracle, OracleError, StateEncoder};
use crate::rules::RulesError;

use super::config::MCTSConfig;
use super::node::{Edge, MCTSNode, NodeId};
use super::policy::{legal_priors, terminal_value, SelectionPolicy, PUCT};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Errors that abort a search call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Root statistics returned by `MCTSSearch::search`.
///
/// Both lists hold one entry per legal root action, in legal-action order.
/// They are empty when the root has no legal action.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchResult {
    /// Visit distribution N(a) / sum N.
    pub policy: Vec<(Action, f32)>,

    /// Mean value Q(a) from the root mover's view, 0 if unvisited.
    pub values: Vec<(Action, f32)>,

    /// Sum of root edge visits, including earlier calls on the same root.
    pub total_visits: u32,

    /// Oracle value of the root position for its mover, 0 when the root
    /// was never expanded.
    pub root_value: f32,
}

impl SearchResult {
    /// Whether the root had no legal action.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policy.is_empty()
    }

    /// Action with the highest probability. First one wins ties.
    #[must_use]
    pub fn best_action(&self) -> Option<Action> {
        let mut best: Option<(Action, f32)> = None;
        for &(action, p) in &self.policy {
            if best.map_or(true, |(_, bp)| p > bp) {
                best = Some((action, p));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Sample an action proportionally to the policy.
    pub fn sample_action(&self, rng: &mut GameRng) -> Option<Action> {
        let weights: Vec<f32> = self.policy.iter().map(|&(_, p)| p).collect();
        rng.choose_weighted(&weights).map(|i| self.policy[i].0)
    }

    /// Probability of `action`, 0 if it is not a root action.
    #[must_use]
    pub fn probability(&self, action: Action) -> f32 {
        self.policy
            .iter()
            .find(|&&(a, _)| a == action)
            .map_or(0.0, |&(_, p)| p)
    }

    /// Q-value of `action`, `None` if it is not a root action.
    #[must_use]
    pub fn value(&self, action: Action) -> Option<f32> {
        self.values.iter().find(|&&(a, _)| a == action).map(|&(_, q)| q)
    }
}

/// How a simulation's walk ended.
enum Leaf {
    Terminal(f32),
    NoActions,
    Expanded(f32),
}

/// Main MCTS search context.
///
/// Generic over the oracle. Owns the search tree, configuration and noise
/// RNG, and provides methods to run searches.
pub struct MCTSSearch<O: Oracle> {
    /// Position evaluator.
    oracle: O,

    /// Search configuration.
    config: MCTSConfig,

    /// The search tree.
    tree: MCTSTree,

    /// RNG for root noise.
    rng: GameRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy>,

    /// Board encoder used for oracle queries.
    encoder: ContrastEncoder,

    /// Statistics of the last search call.
    stats: SearchStats,

    /// Reused path buffer: (node, edge index) per ply.
    path: Vec<(NodeId, usize)>,
}

impl<O: Oracle> MCTSSearch<O> {
    /// Create a new MCTS search context.
    pub fn new(oracle: O, config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);
        let tree = MCTSTree::with_capacity(config.initial_capacity);

        Self {
            oracle,
            config,
            tree,
            rng,
            selection: Box::new(PUCT),
            encoder: ContrastEncoder::new(),
            stats: SearchStats::default(),
            path: Vec::with_capacity(64),
        }
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom encoder.
    pub fn with_encoder(mut self, encoder: ContrastEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Run `simulations` simulations from `root` and report root statistics.
    ///
    /// `root` is only read. Statistics accumulate in the persistent tree,
    /// so searching the same root again adds to its visit counts.
    pub fn search(&mut self, root: &Board, simulations: u32) -> Result<SearchResult, SearchError> {
        let start = Instant::now();
        self.stats.reset();

        if root.is_game_over() {
            return Ok(SearchResult::default());
        }

        let root_id = match self.tree.lookup(&root.key()) {
            Some(id) => id,
            None => self.expand(root)?.0,
        };

        if self.tree.get(root_id).is_leaf() {
            return Ok(SearchResult::default());
        }

        if self.config.has_root_noise() {
            self.add_root_noise(root_id);
        }

        for _ in 0..simulations {
            self.simulate(root, root_id)?;
            self.stats.simulations += 1;
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        debug!(
            simulations = self.stats.simulations,
            nodes_expanded = self.stats.nodes_expanded,
            terminal_hits = self.stats.terminal_hits,
            max_depth = self.stats.max_depth,
            tree_size = self.tree.len(),
            time_us = self.stats.time_us,
            "search complete"
        );

        Ok(self.root_result(root_id))
    }

    /// One simulation: select down to a leaf, evaluate it, back up.
    fn simulate(&mut self, root: &Board, root_id: NodeId) -> Result<(), SearchError> {
        let mut board = root.clone();
        let mut node_id = root_id;
        self.path.clear();

        let leaf = loop {
            let Some(edge_idx) = self.selection.select(self.tree.get(node_id), &self.config) else {
                break Leaf::NoActions;
            };
            self.path.push((node_id, edge_idx));

            let edge = &self.tree.get(node_id).edges[edge_idx];
            let (action, cached) = (edge.action, edge.child);
            board.apply(action);

            if board.is_game_over() {
                break Leaf::Terminal(terminal_value(&board));
            }

            let child = if cached.is_none() {
                match self.tree.lookup(&board.key()) {
                    Some(id) => id,
                    None => {
                        let (id, value) = self.expand(&board)?;
                        self.tree.get_mut(node_id).edges[edge_idx].child = id;
                        break Leaf::Expanded(value);
                    }
                }
            } else {
                cached
            };
            self.tree.get_mut(node_id).edges[edge_idx].child = child;
            node_id = child;
        };

        let mut value = match leaf {
            Leaf::Terminal(value) => {
                self.stats.terminal_hits += 1;
                value
            }
            Leaf::NoActions => 0.0,
            Leaf::Expanded(value) => value,
        };

        let depth = self.path.len() as u32;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        trace!(depth, value, "simulation");

        for &(id, edge_idx) in self.path.iter().rev() {
            value = -value;
            self.tree.get_mut(id).record(edge_idx, value);
        }

        Ok(())
    }

    /// Query the oracle for `board` and store the new node.
    ///
    /// Returns the node and the oracle's value for the side to move.
    fn expand(&mut self, board: &Board) -> Result<(NodeId, f32), SearchError> {
        let encoded = self.encoder.encode(board);
        let output = self.oracle.evaluate(&encoded)?;
        output.validate()?;

        let mover = board.to_move();
        let actions = board.legal_actions();
        let priors = legal_priors(&output, &actions, mover);
        let edges = actions
            .into_iter()
            .zip(priors)
            .map(|(action, prior)| Edge::new(action, prior))
            .collect();

        let id = self.tree.insert(board.key(), MCTSNode::new(mover, output.value, edges));
        self.stats.nodes_expanded += 1;
        Ok((id, output.value))
    }

    /// Mix Dirichlet noise into the root priors in place.
    fn add_root_noise(&mut self, root_id: NodeId) {
        let epsilon = self.config.dirichlet_epsilon;
        let count = self.tree.get(root_id).edges.len();

        let Some(noise) = self.rng.dirichlet(f64::from(self.config.dirichlet_alpha), count) else {
            warn!(alpha = self.config.dirichlet_alpha, "invalid Dirichlet alpha, skipping root noise");
            return;
        };

        for (edge, eta) in self.tree.get_mut(root_id).edges.iter_mut().zip(noise) {
            edge.prior = (1.0 - epsilon) * edge.prior + epsilon * eta;
        }
    }

    fn root_result(&self, root_id: NodeId) -> SearchResult {
        let root = self.tree.get(root_id);
        let total: u32 = root.edges.iter().map(|e| e.visits).sum();

        let policy = if total == 0 {
            let uniform = 1.0 / root.edges.len() as f32;
            root.edges.iter().map(|e| (e.action, uniform)).collect()
        } else {
            root.edges
                .iter()
                .map(|e| (e.action, e.visits as f32 / total as f32))
                .collect()
        };
        let values = root.edges.iter().map(|e| (e.action, e.mean_value())).collect();

        SearchResult {
            policy,
            values,
            total_visits: total,
            root_value: root.value,
        }
    }

    /// Drop the whole tree.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Get search statistics of the last call.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree.
    #[must_use]
    pub fn tree(&self) -> &MCTSTree {
        &self.tree
    }

    /// Get the configuration.
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Get the oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}
