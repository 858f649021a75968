//! Core game types: players, board, actions, symmetry, RNG.
//!
//! Everything here is pure data plus the action codec. The rules that move
//! a `Board` forward live in `crate::rules`.

pub mod action;
pub mod board;
pub mod player;
pub mod rng;
pub mod symmetry;

pub use action::{Action, ActionError, Placement, ACTION_SPACE, MOVE_SPACE, TILE_SPACE};
pub use board::{
    Board, History, Outcome, Piece, Snapshot, Square, StateKey, Stock, Tile, TileStock,
    BOARD_SIZE, HISTORY_LEN, INITIAL_BLACK_TILES, INITIAL_GRAY_TILES, NUM_SQUARES,
    PIECES_PER_PLAYER,
};
pub use player::{Player, PlayerMap};
pub use rng::GameRng;
pub use symmetry::{canonical_action, flip_action, flip_cell, flip_grid};
