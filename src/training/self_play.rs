//! Self-play loop for generating training data.
//!
//! Both sides are played by one `MCTSSearch` whose tree persists for the
//! whole game. The first `temperature_threshold` moves are sampled in
//! proportion to root visits, later moves take the most visited action.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Board, GameRng, Outcome};
use crate::mcts::{MCTSConfig, MCTSSearch, SearchError};
use crate::nn::Oracle;

use super::trajectory::{Step, Trajectory};

/// Configuration for self-play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelfPlayConfig {
    /// MCTS simulations per move.
    pub simulations: u32,

    /// Moves before this number are sampled from the visit distribution;
    /// from here on the most visited action is played.
    pub temperature_threshold: u32,

    /// A game still running after this many moves is scored as a draw.
    pub max_moves: u32,

    /// Added to the game index by `play_games` to derive game seeds.
    pub seed_offset: u64,

    /// Search settings. The seed is replaced by the game seed.
    pub mcts: MCTSConfig,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            simulations: 50,
            temperature_threshold: 10,
            max_moves: 150,
            seed_offset: 0,
            mcts: MCTSConfig::default(),
        }
    }
}

impl SelfPlayConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set MCTS simulations per move.
    #[must_use]
    pub fn with_simulations(mut self, simulations: u32) -> Self {
        self.simulations = simulations;
        self
    }

    /// Set the move number at which play turns greedy.
    #[must_use]
    pub fn with_temperature_threshold(mut self, threshold: u32) -> Self {
        self.temperature_threshold = threshold;
        self
    }

    /// Set the move cap.
    #[must_use]
    pub fn with_max_moves(mut self, max_moves: u32) -> Self {
        self.max_moves = max_moves;
        self
    }

    /// Set seed offset.
    #[must_use]
    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    /// Set the search configuration.
    #[must_use]
    pub fn with_mcts(mut self, mcts: MCTSConfig) -> Self {
        self.mcts = mcts;
        self
    }

    /// Whether the move at `move_number` is sampled rather than greedy.
    #[must_use]
    pub fn samples_move(&self, move_number: u32) -> bool {
        move_number < self.temperature_threshold
    }
}

/// Worker for running self-play games.
#[derive(Clone, Debug, Default)]
pub struct SelfPlayWorker {
    config: SelfPlayConfig,
}

impl SelfPlayWorker {
    #[must_use]
    pub fn new(config: SelfPlayConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    /// Play one game from the initial position.
    ///
    /// `seed` drives both the root noise and move sampling, so the same
    /// seed and oracle replay the same game. An oracle failure aborts the
    /// game.
    pub fn play_game<O: Oracle>(&self, oracle: O, seed: u64) -> Result<Trajectory, SearchError> {
        let mut search = MCTSSearch::new(oracle, self.config.mcts.clone().with_seed(seed));
        let mut rng = GameRng::new(seed).fork();
        let mut board = Board::new();
        let mut trajectory = Trajectory::new(seed);

        while !board.is_game_over() {
            let move_number = board.move_count();
            if move_number >= self.config.max_moves {
                board.set_outcome(Outcome::Draw);
                break;
            }

            let result = search.search(&board, self.config.simulations)?;
            let action = if self.config.samples_move(move_number) {
                result.sample_action(&mut rng)
            } else {
                result.best_action()
            };
            let Some(action) = action else {
                debug!(move_number, "no legal action, scoring as draw");
                board.set_outcome(Outcome::Draw);
                break;
            };

            trajectory.push(Step::new(
                board.encode_state(),
                result.policy,
                action,
                board.to_move(),
                move_number,
            ));
            board.step(action)?;
        }

        debug!(
            seed,
            sampling_seed = rng.seed(),
            moves = trajectory.len(),
            outcome = ?board.outcome(),
            nodes = search.tree().len(),
            "self-play game finished"
        );
        trajectory.set_outcome(board.outcome());
        Ok(trajectory)
    }

    /// Play `count` games with seeds `seed_offset`, `seed_offset + 1`, ...
    pub fn play_games<O: Oracle>(
        &self,
        oracle: &O,
        count: usize,
    ) -> Result<Vec<Trajectory>, SearchError> {
        (0..count)
            .map(|i| {
                let seed = self.config.seed_offset.wrapping_add(i as u64);
                self.play_game(oracle, seed)
            })
            .collect()
    }
}
