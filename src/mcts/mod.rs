//! Monte Carlo Tree Search guided by an evaluation oracle.
//!
//! ## Overview
//!
//! - **PUCT selection** over priors from the oracle's factorised heads
//! - **Transposition index**: one node per (position, move count)
//! - **Explicit path stack**: no recursion, sign-alternating backup
//! - **Root noise**: Dirichlet mixing for self-play exploration
//! - **Persistent tree**: repeated searches on a root keep its statistics
//!
//! ## Usage
//!
//! ```rust
//! use contrast_zero::core::Board;
//! use contrast_zero::mcts::{MCTSConfig, MCTSSearch};
//! use contrast_zero::nn::UniformOracle;
//!
//! let mut board = Board::new();
//! let mut search = MCTSSearch::new(UniformOracle, MCTSConfig::default());
//!
//! let result = search.search(&board, 32).unwrap();
//! let sum: f32 = result.policy.iter().map(|&(_, p)| p).sum();
//! assert!((sum - 1.0).abs() < 1e-4);
//!
//! if let Some(action) = result.best_action() {
//!     board.step(action).unwrap();
//! }
//! ```
//!
//! ## Custom Policies
//!
//! ```rust,ignore
//! let search = MCTSSearch::new(oracle, config).with_selection(MySelection);
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::MCTSConfig;
pub use node::{Edge, MCTSNode, NodeId};
pub use policy::{legal_priors, terminal_value, SelectionPolicy, PUCT};
pub use search::{MCTSSearch, SearchError, SearchResult};
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
