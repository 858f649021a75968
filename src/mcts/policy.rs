//! MCTS policies: edge selection, leaf priors and terminal values.
//!
//! Selection is trait-based so the search loop does not depend on the
//! formula. `PUCT` is the default and the only rule the oracle's priors are
//! calibrated for.

use crate::core::{canonical_action, Action, Board, Outcome, Player};
use crate::nn::OracleOutput;

use super::config::MCTSConfig;
use super::node::MCTSNode;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which edge to follow from an expanded node.
pub trait SelectionPolicy: Send + Sync {
    /// Index of the edge to follow, `None` if the node has no edges.
    fn select(&self, node: &MCTSNode, config: &MCTSConfig) -> Option<usize>;
}

/// PUCT selection policy (Predictor + UCB for Trees).
///
/// Formula: Q(a) + c * P(a) * sqrt(sum_b N(b)) / (1 + N(a)).
/// The first edge reaching the maximum wins, so ties follow legal-action
/// order.
#[derive(Clone, Debug, Default)]
pub struct PUCT;

impl SelectionPolicy for PUCT {
    fn select(&self, node: &MCTSNode, config: &MCTSConfig) -> Option<usize> {
        let sqrt_total = (node.visits as f32).sqrt();

        let mut best = None;
        let mut best_score = f32::NEG_INFINITY;
        for (i, edge) in node.edges.iter().enumerate() {
            let u = config.c_puct * edge.prior * sqrt_total / (1.0 + edge.visits as f32);
            let score = edge.mean_value() + u;
            if score > best_score {
                best_score = score;
                best = Some(i);
            }
        }

        // NaN scores never compare greater; fall back to the first edge.
        best.or_else(|| (!node.edges.is_empty()).then_some(0))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Prior over `actions` from the oracle's factorised heads.
///
/// Each legal action scores `move_logit + tile_logit` of its canonical form
/// for `mover`; the scores are softmaxed over the legal actions only. The
/// output is in the same order as `actions`.
#[must_use]
pub fn legal_priors(output: &OracleOutput, actions: &[Action], mover: Player) -> Vec<f32> {
    if actions.is_empty() {
        return Vec::new();
    }

    // Two finite f32 logits can still overflow when summed in f32.
    let scores: Vec<f64> = actions
        .iter()
        .map(|&action| {
            let canonical = canonical_action(action, mover);
            f64::from(output.move_logits[canonical.move_index()])
                + f64::from(output.tile_logits[canonical.tile_index()])
        })
        .collect();

    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Value of a finished game for the player who would move next.
///
/// 0 for a draw, +1 if that player is the winner, -1 otherwise.
#[must_use]
pub fn terminal_value(board: &Board) -> f32 {
    match board.outcome() {
        Outcome::Winner(winner) if winner == board.to_move() => 1.0,
        Outcome::Winner(_) => -1.0,
        Outcome::Draw | Outcome::Ongoing => 0.0,
    }
}
