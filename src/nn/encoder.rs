//! State encoding for neural network input.
//!
//! ## Plane layout
//!
//! The board encoding is a `[90, 5, 5]` tensor. For history frame `i`
//! (0 = newest, short histories repeat their oldest frame):
//!
//! | planes    | content                               |
//! |-----------|---------------------------------------|
//! | `0 + i`   | mover's pieces                        |
//! | `8 + i`   | opponent's pieces                     |
//! | `16 + i`  | black tiles                           |
//! | `24 + i`  | gray tiles                            |
//! | `32..56`  | unused, always zero                   |
//! | `56 + i`  | mover's black stock / 3               |
//! | `64 + i`  | mover's gray stock / 1                |
//! | `72 + i`  | opponent's black stock / 3            |
//! | `80 + i`  | opponent's gray stock / 1             |
//! | `88`      | all ones                              |
//! | `89`      | move count / 100                      |
//!
//! Piece and tile planes are rotated 180° when player two is to move, so
//! the mover always sits at the bottom. Stock and scalar planes are not.

use crate::core::{
    flip_cell, Board, Piece, Player, Snapshot, Tile, ACTION_SPACE, BOARD_SIZE, HISTORY_LEN,
    INITIAL_BLACK_TILES, INITIAL_GRAY_TILES, NUM_SQUARES,
};
use crate::nn::traits::EncodedState;

/// Number of feature planes in the board encoding.
pub const NUM_PLANES: usize = 90;

const MOVER_PIECES: usize = 0;
const OPPONENT_PIECES: usize = MOVER_PIECES + HISTORY_LEN;
const BLACK_TILES: usize = OPPONENT_PIECES + HISTORY_LEN;
const GRAY_TILES: usize = BLACK_TILES + HISTORY_LEN;
const MOVER_BLACK_STOCK: usize = 56;
const MOVER_GRAY_STOCK: usize = MOVER_BLACK_STOCK + HISTORY_LEN;
const OPPONENT_BLACK_STOCK: usize = MOVER_GRAY_STOCK + HISTORY_LEN;
const OPPONENT_GRAY_STOCK: usize = OPPONENT_BLACK_STOCK + HISTORY_LEN;
const PERSPECTIVE: usize = 88;
const MOVE_COUNT: usize = 89;

/// Encodes game state into tensors for neural network input.
///
/// Each encoder defines:
/// - How to convert a board to a tensor from the mover's perspective
/// - The shape of the output tensor
/// - The size of the action space the policy head covers
pub trait StateEncoder: Send + Sync {
    /// Encode the board from the side to move's perspective.
    fn encode(&self, board: &Board) -> EncodedState;

    /// Get the shape of encoded states.
    fn output_shape(&self) -> Vec<usize>;

    /// Get the total number of possible actions.
    fn action_space_size(&self) -> usize;
}

/// The 90-plane history encoder described in the module docs.
#[derive(Clone, Debug)]
pub struct ContrastEncoder {
    move_count_scale: f32,
}

impl ContrastEncoder {
    /// Create an encoder with the standard normalizers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            move_count_scale: 100.0,
        }
    }

    /// Set the divisor for the move-count plane.
    #[must_use]
    pub fn with_move_count_scale(mut self, scale: f32) -> Self {
        self.move_count_scale = scale;
        self
    }

    fn fill_plane(tensor: &mut [f32], plane: usize, value: f32) {
        let start = plane * NUM_SQUARES;
        tensor[start..start + NUM_SQUARES].fill(value);
    }

    fn encode_frame(tensor: &mut [f32], frame: usize, snapshot: &Snapshot, mover: Player) {
        let flip = mover == Player::Two;

        for cell in 0..NUM_SQUARES {
            let src = if flip { flip_cell(cell) } else { cell };

            match snapshot.pieces[src] {
                Piece::Owned(owner) if owner == mover => {
                    tensor[(MOVER_PIECES + frame) * NUM_SQUARES + cell] = 1.0;
                }
                Piece::Owned(_) => {
                    tensor[(OPPONENT_PIECES + frame) * NUM_SQUARES + cell] = 1.0;
                }
                Piece::Empty => {}
            }

            match snapshot.tiles[src] {
                Tile::Black => tensor[(BLACK_TILES + frame) * NUM_SQUARES + cell] = 1.0,
                Tile::Gray => tensor[(GRAY_TILES + frame) * NUM_SQUARES + cell] = 1.0,
                Tile::White => {}
            }
        }

        let own = snapshot.stock[mover];
        let other = snapshot.stock[mover.opponent()];
        let black_scale = f32::from(INITIAL_BLACK_TILES);
        let gray_scale = f32::from(INITIAL_GRAY_TILES);

        Self::fill_plane(tensor, MOVER_BLACK_STOCK + frame, f32::from(own.black) / black_scale);
        Self::fill_plane(tensor, MOVER_GRAY_STOCK + frame, f32::from(own.gray) / gray_scale);
        Self::fill_plane(tensor, OPPONENT_BLACK_STOCK + frame, f32::from(other.black) / black_scale);
        Self::fill_plane(tensor, OPPONENT_GRAY_STOCK + frame, f32::from(other.gray) / gray_scale);
    }
}

impl Default for ContrastEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StateEncoder for ContrastEncoder {
    fn encode(&self, board: &Board) -> EncodedState {
        let mut encoded = EncodedState::zeros(self.output_shape());
        let tensor = &mut encoded.tensor;
        let mover = board.to_move();
        // A board built by hand may carry no history; encode it as its own
        // only frame.
        let current = board.snapshot();

        for frame in 0..HISTORY_LEN {
            let snapshot = board.history().frame(frame).unwrap_or(&current);
            Self::encode_frame(tensor, frame, snapshot, mover);
        }

        Self::fill_plane(tensor, PERSPECTIVE, 1.0);
        Self::fill_plane(tensor, MOVE_COUNT, board.move_count() as f32 / self.move_count_scale);

        encoded
    }

    fn output_shape(&self) -> Vec<usize> {
        vec![NUM_PLANES, BOARD_SIZE, BOARD_SIZE]
    }

    fn action_space_size(&self) -> usize {
        ACTION_SPACE
    }
}

impl Board {
    /// Encode this position with the standard `ContrastEncoder`.
    #[must_use]
    pub fn encode_state(&self) -> EncodedState {
        ContrastEncoder::new().encode(self)
    }
}
