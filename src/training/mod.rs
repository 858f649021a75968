//! Training infrastructure for oracle training.
//!
//! This module provides the data structures and self-play loop for
//! generating training data in an AlphaZero-style training pipeline.
//!
//! ## Overview
//!
//! - **Trajectory**: Records a complete game with states, policies, and outcome
//! - **ExperienceBuffer**: FIFO replay buffer of training samples
//! - **SelfPlayWorker**: Runs games using MCTS to generate trajectories
//!
//! ## Usage
//!
//! ```
//! use contrast_zero::nn::UniformOracle;
//! use contrast_zero::training::{ExperienceBuffer, SelfPlayConfig, SelfPlayWorker};
//!
//! let config = SelfPlayConfig::default()
//!     .with_simulations(4)
//!     .with_max_moves(6);
//! let worker = SelfPlayWorker::new(config);
//!
//! let trajectory = worker.play_game(&UniformOracle, 7).unwrap();
//!
//! let mut buffer = ExperienceBuffer::new(10_000);
//! buffer.push_trajectory(&trajectory);
//! let batch = buffer.sample_batch(4, 0);
//! assert_eq!(batch.len(), 4.min(trajectory.len()));
//! ```

pub mod self_play;
pub mod trajectory;

use thiserror::Error;

/// Errors raised while storing training data.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("trajectory encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}

// Re-export main types
pub use self_play::{SelfPlayConfig, SelfPlayWorker};
pub use trajectory::{ExperienceBuffer, Step, Trajectory, TrainingSample};
