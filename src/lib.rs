//! # contrast-zero
//!
//! Rules engine and AlphaZero-style tree search for Contrast, a two-player
//! 5x5 race game where the tile under a piece decides how it moves.
//!
//! ## Design Principles
//!
//! 1. **Exact Rules**: Move generation is deterministic and ordered, so
//!    search tie-breaking is reproducible.
//!
//! 2. **Injected Evaluation**: Search never knows what network sits behind
//!    the `Oracle` capability. It only sees logits and a value.
//!
//! 3. **Canonical Perspective**: Oracle input and output are always from
//!    the mover's view; player two's positions are rotated 180 degrees.
//!
//! ## Architecture
//!
//! - **Arena Tree**: Nodes live in a flat `Vec` addressed by `NodeId`, with
//!   a separate transposition index keyed by `StateKey`.
//!
//! - **Persistent Data Structures**: Board history in `im::Vector`, so
//!   cloning a board per simulation stays cheap.
//!
//! - **Seeded Randomness**: Root noise and self-play sampling come from
//!   `GameRng` (ChaCha8). Same seed, same game.
//!
//! ## Modules
//!
//! - `core`: Players, board, actions, symmetry, RNG
//! - `rules`: Move generation and state transitions
//! - `nn`: Feature encoding and the oracle boundary
//! - `mcts`: PUCT Monte Carlo Tree Search
//! - `protocol`: Remote-arena line protocol and bot driver
//! - `training`: Self-play and training data

pub mod core;
pub mod mcts;
pub mod nn;
pub mod protocol;
pub mod rules;
pub mod training;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionError, Board, GameRng, Outcome, Piece, Placement, Player, PlayerMap, Square,
    Stock, Tile,
};

pub use crate::rules::RulesError;

pub use crate::nn::{ContrastEncoder, EncodedState, Oracle, OracleError, OracleOutput};

pub use crate::mcts::{MCTSConfig, MCTSSearch, SearchError, SearchResult, SearchStats};

pub use crate::protocol::{ArenaBot, ArenaSession, ProtocolError};

pub use crate::training::{ExperienceBuffer, SelfPlayConfig, SelfPlayWorker, Trajectory};
