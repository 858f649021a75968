//! 180° rotation between the two players' points of view.
//!
//! The oracle always sees the board with the side to move at the bottom.
//! When player two is to move, the encoder rotates the board and every
//! action has to be rotated the same way before its logits are looked up.

use super::action::{Action, Placement};
use super::board::{Square, NUM_SQUARES};
use super::player::Player;

impl Square {
    /// The square at the same place after a 180° rotation (`24 - i`).
    #[inline]
    #[must_use]
    pub fn flipped(self) -> Self {
        match Square::new(NUM_SQUARES - 1 - self.index()) {
            Some(square) => square,
            None => unreachable!("rotation keeps squares on the board"),
        }
    }
}

impl Placement {
    /// Same tile color, rotated square.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Placement::None => Placement::None,
            Placement::Black(square) => Placement::Black(square.flipped()),
            Placement::Gray(square) => Placement::Gray(square.flipped()),
        }
    }
}

impl Action {
    /// Rotate origin, destination and placement square by 180°.
    #[must_use]
    pub fn flipped(self) -> Self {
        Action::from_parts(self.from().flipped(), self.to().flipped(), self.placement().flipped())
    }
}

/// Rotate a cell index by 180°.
#[inline]
#[must_use]
pub fn flip_cell(index: usize) -> usize {
    NUM_SQUARES - 1 - index
}

/// Rotate an action by 180°. Involutive.
#[inline]
#[must_use]
pub fn flip_action(action: Action) -> Action {
    action.flipped()
}

/// Express a true-coordinate action in the oracle's orientation for `mover`.
#[inline]
#[must_use]
pub fn canonical_action(action: Action, mover: Player) -> Action {
    match mover {
        Player::One => action,
        Player::Two => action.flipped(),
    }
}

/// Rotate a row-major grid by 180°.
#[must_use]
pub fn flip_grid<T: Copy>(grid: &[T; NUM_SQUARES]) -> [T; NUM_SQUARES] {
    std::array::from_fn(|i| grid[flip_cell(i)])
}
