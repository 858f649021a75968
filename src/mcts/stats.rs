//! MCTS search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one `search` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Simulations run.
    pub simulations: u32,

    /// Nodes expanded (oracle calls).
    pub nodes_expanded: u32,

    /// Simulations that ended on a finished game.
    pub terminal_hits: u32,

    /// Longest path walked from the root, in plies.
    pub max_depth: u32,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Calculate simulations per second.
    #[must_use]
    pub fn simulations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.simulations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Fraction of simulations that needed an oracle call.
    #[must_use]
    pub fn expansion_rate(&self) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.nodes_expanded as f64 / self.simulations as f64
        }
    }
}
