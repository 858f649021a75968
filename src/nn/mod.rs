//! Neural network integration.
//!
//! This module defines the boundary between search and the evaluation
//! network that guides it.
//!
//! ## Overview
//!
//! - **Traits**: `Oracle` (encoded position in, logits and value out)
//! - **Encoding**: `StateEncoder` trait and the 90-plane `ContrastEncoder`
//! - **Baseline**: `UniformOracle`, `ConstantOracle` for testing
//!
//! ## Usage
//!
//! ```
//! use contrast_zero::core::Board;
//! use contrast_zero::nn::{Oracle, UniformOracle};
//!
//! let board = Board::new();
//! let encoded = board.encode_state();
//! assert_eq!(encoded.shape, vec![90, 5, 5]);
//!
//! let output = UniformOracle.evaluate(&encoded).unwrap();
//! assert!(output.validate().is_ok());
//! ```

pub mod encoder;
pub mod traits;

// Re-export main types
pub use encoder::{ContrastEncoder, StateEncoder, NUM_PLANES};
pub use traits::{ConstantOracle, EncodedState, Oracle, OracleError, OracleOutput, UniformOracle};
