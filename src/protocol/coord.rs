//! Algebraic coordinates: file `a`..`e` left to right, rank `1`..`5`
//! bottom to top. `a1` is the bottom-left square, `(x, y) = (0, 4)`.

use crate::core::{Square, BOARD_SIZE};

use super::ProtocolError;

impl Square {
    /// Algebraic name of this square.
    #[must_use]
    pub fn to_coord(self) -> String {
        let file = char::from(b'a' + self.x() as u8);
        let rank = char::from(b'1' + (BOARD_SIZE - 1 - self.y()) as u8);
        format!("{file}{rank}")
    }

    /// Parse an algebraic name such as `c3`. Surrounding whitespace is
    /// ignored.
    pub fn from_coord(text: &str) -> Result<Self, ProtocolError> {
        let invalid = || ProtocolError::InvalidCoordinate(text.to_string());
        let bytes = text.trim().as_bytes();
        let &[file, rank] = bytes else {
            return Err(invalid());
        };

        let x = file.checked_sub(b'a').map(usize::from).ok_or_else(invalid)?;
        let rank = rank.checked_sub(b'1').map(usize::from).ok_or_else(invalid)?;
        if rank >= BOARD_SIZE {
            return Err(invalid());
        }
        Square::from_xy(x, BOARD_SIZE - 1 - rank).ok_or_else(invalid)
    }
}
