//! Action codec: a (from, to, tile placement) triple packed into one integer.
//!
//! ```text
//! move_index = from * 25 + to                       0..625
//! tile_index = 0                                     no placement
//!            | 1  + square                           black tile on square
//!            | 26 + square                           gray tile on square
//! code       = move_index * 51 + tile_index          0..31875
//! ```
//!
//! Encoding and decoding are exact inverses over the whole code range.
//! Out-of-range codes are rejected at the boundary (`Action::try_from_code`)
//! so that every `Action` value in the program is decodable.
//!
//! ## Example
//!
//! ```
//! use contrast_zero::core::{Action, Placement, Square};
//!
//! let from = Square::from_xy(0, 4).unwrap();
//! let to = Square::from_xy(0, 3).unwrap();
//! let action = Action::from_parts(from, to, Placement::Gray(from));
//!
//! assert_eq!(action.from(), from);
//! assert_eq!(action.placement(), Placement::Gray(from));
//! assert_eq!(Action::try_from_code(action.code() as u32).unwrap(), action);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::board::{Square, Tile, NUM_SQUARES};

/// Number of (from, to) pairs.
pub const MOVE_SPACE: usize = NUM_SQUARES * NUM_SQUARES;

/// Number of tile choices: no placement, 25 black, 25 gray.
pub const TILE_SPACE: usize = 1 + 2 * NUM_SQUARES;

/// Number of distinct action codes.
pub const ACTION_SPACE: usize = MOVE_SPACE * TILE_SPACE;

const BLACK_OFFSET: usize = 1;
const GRAY_OFFSET: usize = 1 + NUM_SQUARES;

/// Errors from decoding raw action data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("action code {0} out of range (0..31875)")]
    OutOfRange(u32),

    #[error("move index {0} out of range (0..625)")]
    MoveIndexOutOfRange(usize),

    #[error("tile index {0} out of range (0..51)")]
    TileIndexOutOfRange(usize),
}

/// Optional tile placed as part of a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placement {
    None,
    Black(Square),
    Gray(Square),
}

impl Placement {
    /// Build a placement of `tile` on `square`. White means no placement.
    #[must_use]
    pub fn of(tile: Tile, square: Square) -> Self {
        match tile {
            Tile::White => Placement::None,
            Tile::Black => Placement::Black(square),
            Tile::Gray => Placement::Gray(square),
        }
    }

    /// Index into the tile head: 0, `1 + square` or `26 + square`.
    #[must_use]
    pub const fn tile_index(self) -> usize {
        match self {
            Placement::None => 0,
            Placement::Black(square) => BLACK_OFFSET + square.index(),
            Placement::Gray(square) => GRAY_OFFSET + square.index(),
        }
    }

    /// Inverse of `tile_index`.
    pub fn from_tile_index(index: usize) -> Result<Self, ActionError> {
        let square = |offset: usize| {
            Square::new(index - offset).ok_or(ActionError::TileIndexOutOfRange(index))
        };
        match index {
            0 => Ok(Placement::None),
            i if i < GRAY_OFFSET => Ok(Placement::Black(square(BLACK_OFFSET)?)),
            i if i < TILE_SPACE => Ok(Placement::Gray(square(GRAY_OFFSET)?)),
            _ => Err(ActionError::TileIndexOutOfRange(index)),
        }
    }

    /// Square receiving the tile, if any.
    #[must_use]
    pub const fn square(self) -> Option<Square> {
        match self {
            Placement::None => None,
            Placement::Black(square) | Placement::Gray(square) => Some(square),
        }
    }

    /// Tile color being placed, if any.
    #[must_use]
    pub const fn tile(self) -> Option<Tile> {
        match self {
            Placement::None => None,
            Placement::Black(_) => Some(Tile::Black),
            Placement::Gray(_) => Some(Tile::Gray),
        }
    }
}

/// A complete move, stored as its action code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action(u16);

impl Action {
    /// Combine a move index and a tile index.
    pub fn new(move_index: usize, tile_index: usize) -> Result<Self, ActionError> {
        if move_index >= MOVE_SPACE {
            return Err(ActionError::MoveIndexOutOfRange(move_index));
        }
        if tile_index >= TILE_SPACE {
            return Err(ActionError::TileIndexOutOfRange(tile_index));
        }
        Ok(Self((move_index * TILE_SPACE + tile_index) as u16))
    }

    /// Build an action from its components.
    #[must_use]
    pub fn from_parts(from: Square, to: Square, placement: Placement) -> Self {
        let move_index = from.index() * NUM_SQUARES + to.index();
        Self((move_index * TILE_SPACE + placement.tile_index()) as u16)
    }

    /// Validate a raw action code.
    pub fn try_from_code(code: u32) -> Result<Self, ActionError> {
        if (code as usize) < ACTION_SPACE {
            Ok(Self(code as u16))
        } else {
            Err(ActionError::OutOfRange(code))
        }
    }

    /// Raw action code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u16 {
        self.0
    }

    /// `from * 25 + to`.
    #[inline]
    #[must_use]
    pub const fn move_index(self) -> usize {
        self.0 as usize / TILE_SPACE
    }

    #[inline]
    #[must_use]
    pub const fn tile_index(self) -> usize {
        self.0 as usize % TILE_SPACE
    }

    /// Square the piece leaves.
    #[inline]
    #[must_use]
    pub fn from(self) -> Square {
        square_of(self.move_index() / NUM_SQUARES)
    }

    /// Square the piece lands on.
    #[inline]
    #[must_use]
    pub fn to(self) -> Square {
        square_of(self.move_index() % NUM_SQUARES)
    }

    /// Tile placed with this move.
    #[must_use]
    pub fn placement(self) -> Placement {
        match self.tile_index() {
            0 => Placement::None,
            i if i < GRAY_OFFSET => Placement::Black(square_of(i - BLACK_OFFSET)),
            i => Placement::Gray(square_of(i - GRAY_OFFSET)),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.from(), self.to())?;
        match self.placement() {
            Placement::None => Ok(()),
            Placement::Black(square) => write!(f, " b{square}"),
            Placement::Gray(square) => write!(f, " g{square}"),
        }
    }
}

// Every constructor keeps the code below ACTION_SPACE, so the derived
// indices are always < 25.
fn square_of(index: usize) -> Square {
    Square::new(index).unwrap_or_else(|| unreachable!("square index {index} from a valid action"))
}
