//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// PUCT exploration constant (default: 1.0).
    /// Higher values lean harder on the oracle's priors.
    pub c_puct: f32,

    /// Concentration of the root Dirichlet noise (default: 0.3).
    pub dirichlet_alpha: f32,

    /// Weight of the root noise in the mixed prior (default: 0.25).
    /// Zero disables noise.
    pub dirichlet_epsilon: f32,

    /// Random seed for root noise.
    /// Same seed, same oracle and same root produce the same search.
    pub seed: u64,

    /// Initial node capacity of the tree arena.
    pub initial_capacity: usize,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            c_puct: 1.0,
            dirichlet_alpha: 0.3,
            dirichlet_epsilon: 0.25,
            seed: 42,
            initial_capacity: 1024,
        }
    }
}

impl MCTSConfig {
    /// Default settings without root noise, for match play.
    #[must_use]
    pub fn for_evaluation() -> Self {
        Self::default().with_dirichlet_epsilon(0.0)
    }

    /// Set the exploration constant.
    #[must_use]
    pub fn with_c_puct(mut self, c_puct: f32) -> Self {
        self.c_puct = c_puct;
        self
    }

    /// Set the Dirichlet concentration.
    #[must_use]
    pub fn with_dirichlet_alpha(mut self, alpha: f32) -> Self {
        self.dirichlet_alpha = alpha;
        self
    }

    /// Set the noise weight.
    #[must_use]
    pub fn with_dirichlet_epsilon(mut self, epsilon: f32) -> Self {
        self.dirichlet_epsilon = epsilon;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Whether searches mix noise into the root priors.
    #[must_use]
    pub fn has_root_noise(&self) -> bool {
        self.dirichlet_epsilon > 0.0 && self.dirichlet_alpha > 0.0
    }
}
