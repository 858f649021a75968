//! Remote-arena line protocol.
//!
//! The arena server talks a line-oriented ASCII protocol. This module holds
//! the codec and the client-side state machine; reading and writing the
//! socket is left to the caller.
//!
//! ## Flow
//!
//! ```text
//! client: ROLE X bot alphazero
//! server: INFO You are X (bot)
//! server: STATE
//! server: turn=X
//! server: status=ongoing
//! server: pieces=a1:x,b1:x,...
//! server: END
//! client: MOVE a1,a2 c3b
//! ```
//!
//! ## Components
//!
//! - `coord`: algebraic square names (`a1` is the bottom-left cell)
//! - `message`: client lines (`ROLE`, `MOVE`, `GET_STATE`)
//! - `snapshot`: parsing `STATE` blocks and rebuilding a `Board`
//! - `session`: line buffering, move counting and the history cache
//! - `bot`: a session driven by `MCTSSearch`

pub mod bot;
pub mod coord;
pub mod message;
pub mod session;
pub mod snapshot;

use thiserror::Error;

use crate::mcts::SearchError;

/// Errors raised by the arena driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    #[error("invalid coordinate: {0:?}")]
    InvalidCoordinate(String),

    #[error("invalid move text: {0:?}")]
    InvalidMove(String),

    #[error("search failed: {0}")]
    Search(#[from] SearchError),
}

// Re-export main types
pub use bot::ArenaBot;
pub use message::{format_move_text, parse_move_text, ClientMessage, RoleRequest};
pub use session::{ArenaSession, SessionEvent};
pub use snapshot::{GameStatus, StateSnapshot};
