//! Game rules: move generation and state transitions.
//!
//! Both halves are written as inherent methods on `Board`:
//! - `legal_destinations`, `legal_actions`, `is_legal` (move generation)
//! - `step`, `step_code` (checked transitions)
//!
//! Move generation is deterministic and ordered; search relies on the
//! order for tie-breaking.

pub mod engine;
pub mod movegen;

pub use engine::RulesError;
pub use movegen::{directions, Destinations};
