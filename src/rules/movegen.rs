//! Legal move generation.
//!
//! A piece moves along the directions its tile allows. In each direction it
//! slides over friendly pieces and stops on the first empty cell; an enemy
//! piece or the board edge ends the direction with no destination.
//!
//! Enumeration order is fixed (pieces row-major, directions in table order,
//! placement cells row-major, black before gray). Search breaks ties by
//! this order, so changing it changes search results.

use smallvec::SmallVec;

use crate::core::{Action, Board, Piece, Placement, Square, Tile};

/// Destinations of a single piece. Never more than one per direction.
pub type Destinations = SmallVec<[Square; 8]>;

const ORTHOGONAL: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Step directions for a piece standing on `tile`.
#[must_use]
pub fn directions(tile: Tile) -> &'static [(i8, i8)] {
    match tile {
        Tile::White => &ORTHOGONAL,
        Tile::Black => &DIAGONAL,
        Tile::Gray => &ALL_DIRECTIONS,
    }
}

impl Board {
    /// Cells the piece on `square` may move to.
    ///
    /// Empty when `square` holds no piece.
    #[must_use]
    pub fn legal_destinations(&self, square: Square) -> Destinations {
        let mut out = Destinations::new();
        let Some(owner) = self.piece(square).owner() else {
            return out;
        };

        for &(dx, dy) in directions(self.tile(square)) {
            let mut cursor = square.offset(dx, dy);
            while let Some(cell) = cursor {
                match self.piece(cell) {
                    Piece::Empty => {
                        out.push(cell);
                        break;
                    }
                    Piece::Owned(player) if player == owner => cursor = cell.offset(dx, dy),
                    Piece::Owned(_) => break,
                }
            }
        }

        out
    }

    /// Every legal action for the side to move, empty once the game is over.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.is_game_over() {
            return actions;
        }

        let mover = self.to_move();
        let stock = self.stock(mover);
        let place_black = stock.black > 0;
        let place_gray = stock.gray > 0;
        let white_cells: SmallVec<[Square; 25]> =
            Square::all().filter(|&sq| self.tile(sq) == Tile::White).collect();

        for from in self.pieces_of(mover) {
            for to in self.legal_destinations(from) {
                actions.push(Action::from_parts(from, to, Placement::None));

                if !stock.has_any() {
                    continue;
                }

                for &cell in &white_cells {
                    if cell == to || (cell != from && !self.piece(cell).is_empty()) {
                        continue;
                    }
                    if place_black {
                        actions.push(Action::from_parts(from, to, Placement::Black(cell)));
                    }
                    if place_gray {
                        actions.push(Action::from_parts(from, to, Placement::Gray(cell)));
                    }
                }
            }
        }

        actions
    }

    /// Whether `action` is in `legal_actions()`, without enumerating them.
    #[must_use]
    pub fn is_legal(&self, action: Action) -> bool {
        if self.is_game_over() {
            return false;
        }

        let mover = self.to_move();
        let (from, to) = (action.from(), action.to());
        if self.piece(from) != Piece::Owned(mover) {
            return false;
        }
        if !self.legal_destinations(from).contains(&to) {
            return false;
        }

        match (action.placement().square(), action.placement().tile()) {
            (Some(cell), Some(tile)) => {
                self.stock(mover).count(tile) > 0
                    && self.tile(cell) == Tile::White
                    && cell != to
                    && (cell == from || self.piece(cell).is_empty())
            }
            _ => true,
        }
    }
}
