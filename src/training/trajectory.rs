//! Trajectory and experience buffer for training data collection.
//!
//! A trajectory records a complete self-play game, capturing:
//! - Encoded states at each decision point
//! - MCTS visit distributions (the "target" policy)
//! - Actions actually taken
//! - Final game outcome for value targets

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::{canonical_action, Action, GameRng, Outcome, Player, MOVE_SPACE, TILE_SPACE};
use crate::nn::EncodedState;

use super::TrainingError;

/// A single step in a trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Encoded position, from the mover's perspective.
    pub encoded_state: EncodedState,

    /// Root visit distribution over the legal actions, in true
    /// (non-canonical) coordinates.
    pub action_probs: Vec<(Action, f32)>,

    /// The action that was actually played.
    pub action_taken: Action,

    /// The player who made this decision.
    pub player: Player,

    /// Move number in the game (0-indexed).
    pub move_number: u32,
}

impl Step {
    pub fn new(
        encoded_state: EncodedState,
        action_probs: Vec<(Action, f32)>,
        action_taken: Action,
        player: Player,
        move_number: u32,
    ) -> Self {
        Self {
            encoded_state,
            action_probs,
            action_taken,
            player,
            move_number,
        }
    }

    /// Probability the search gave to the action that was played.
    #[must_use]
    pub fn taken_action_prob(&self) -> f32 {
        self.action_probs
            .iter()
            .find(|(a, _)| *a == self.action_taken)
            .map_or(0.0, |(_, p)| *p)
    }

    /// Move-head and tile-head targets.
    ///
    /// Each action's probability is added to the move entry and to the tile
    /// entry of its canonical form, so both targets carry the same mass as
    /// the policy.
    #[must_use]
    pub fn policy_targets(&self) -> (Vec<f32>, Vec<f32>) {
        let mut move_target = vec![0.0; MOVE_SPACE];
        let mut tile_target = vec![0.0; TILE_SPACE];
        for &(action, p) in &self.action_probs {
            let canonical = canonical_action(action, self.player);
            move_target[canonical.move_index()] += p;
            tile_target[canonical.tile_index()] += p;
        }
        (move_target, tile_target)
    }
}

/// A complete game trajectory from self-play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub steps: Vec<Step>,

    /// How the game ended. `Ongoing` only while the game is being recorded.
    pub outcome: Outcome,

    /// Random seed used for this game.
    pub seed: u64,
}

impl Trajectory {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            steps: Vec::new(),
            outcome: Outcome::Ongoing,
            seed,
        }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps where `player` was to move.
    pub fn player_steps(&self, player: Player) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(move |s| s.player == player)
    }

    /// Final reward from `player`'s point of view: +1, -1 or 0.
    #[must_use]
    pub fn player_outcome(&self, player: Player) -> f32 {
        self.outcome.reward_for(player)
    }

    /// One training sample per step, valued from that step's mover.
    #[must_use]
    pub fn to_training_samples(&self) -> Vec<TrainingSample> {
        self.steps
            .iter()
            .map(|step| {
                let (move_target, tile_target) = step.policy_targets();
                TrainingSample {
                    state: step.encoded_state.clone(),
                    move_target,
                    tile_target,
                    value: self.player_outcome(step.player),
                    player: step.player,
                }
            })
            .collect()
    }

    /// Serialize with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TrainingError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from `to_bytes` output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrainingError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// A single training sample extracted from a trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub state: EncodedState,

    /// Target for the move head, `MOVE_SPACE` long.
    pub move_target: Vec<f32>,

    /// Target for the tile head, `TILE_SPACE` long.
    pub tile_target: Vec<f32>,

    /// Game outcome for `player`.
    pub value: f32,

    pub player: Player,
}

/// Replay buffer of training samples.
///
/// FIFO: when full, the oldest samples are dropped first.
#[derive(Clone, Debug)]
pub struct ExperienceBuffer {
    samples: VecDeque<TrainingSample>,
    max_samples: usize,
}

impl ExperienceBuffer {
    /// Default capacity in samples.
    pub const DEFAULT_CAPACITY: usize = 40_000;

    #[must_use]
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_samples.min(Self::DEFAULT_CAPACITY)),
            max_samples,
        }
    }

    /// Add one sample, evicting the oldest if the buffer is full.
    pub fn push(&mut self, sample: TrainingSample) {
        if self.max_samples == 0 {
            return;
        }
        if self.samples.len() >= self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Add every sample of a trajectory, in order.
    pub fn push_trajectory(&mut self, trajectory: &Trajectory) {
        for sample in trajectory.to_training_samples() {
            self.push(sample);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_samples
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TrainingSample> {
        self.samples.iter()
    }

    /// Draw up to `batch_size` distinct samples.
    ///
    /// Uses the provided RNG seed for reproducibility.
    #[must_use]
    pub fn sample_batch(&self, batch_size: usize, seed: u64) -> Vec<TrainingSample> {
        if self.samples.is_empty() || batch_size == 0 {
            return vec![];
        }

        let mut rng = GameRng::new(seed);

        // Fisher-Yates shuffle of the first `batch_size` indices
        let n = self.samples.len();
        let limit = batch_size.min(n);
        let mut indices: Vec<usize> = (0..n).collect();
        for i in 0..limit {
            let j = i + rng.gen_range_usize(0..n - i);
            indices.swap(i, j);
        }

        indices[..limit]
            .iter()
            .map(|&i| self.samples[i].clone())
            .collect()
    }
}

impl Default for ExperienceBuffer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
