//! State transitions: applying a move, placing a tile, deciding the game.
//!
//! `Board::step` is the checked entry point used by game drivers. Search
//! only ever applies actions it just enumerated, so it goes through the
//! unchecked `Board::apply`.

use thiserror::Error;
use tracing::trace;

use crate::core::{Action, ActionError, Board, Outcome, Piece, Player, BOARD_SIZE};

/// Errors from advancing a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("game is already over")]
    GameOver,

    #[error("illegal action {0}")]
    IllegalAction(Action),

    #[error(transparent)]
    InvalidAction(#[from] ActionError),
}

impl Board {
    /// Play `action` for the side to move.
    ///
    /// Returns the outcome after the move. The board is left untouched on
    /// error.
    pub fn step(&mut self, action: Action) -> Result<Outcome, RulesError> {
        if self.is_game_over() {
            return Err(RulesError::GameOver);
        }
        if !self.is_legal(action) {
            return Err(RulesError::IllegalAction(action));
        }
        self.apply(action);
        Ok(self.outcome)
    }

    /// Decode a raw action code and play it.
    pub fn step_code(&mut self, code: u32) -> Result<Outcome, RulesError> {
        let action = Action::try_from_code(code)?;
        self.step(action)
    }

    /// Play an action known to be legal.
    ///
    /// Moves the piece, places the tile, then checks for a winner before
    /// handing the turn over. The turn passes and the history grows even on
    /// the winning move.
    pub(crate) fn apply(&mut self, action: Action) {
        let mover = self.to_move;
        let (from, to) = (action.from(), action.to());

        self.pieces[to.index()] = self.pieces[from.index()];
        self.pieces[from.index()] = Piece::Empty;

        let placement = action.placement();
        if let (Some(square), Some(tile)) = (placement.square(), placement.tile()) {
            self.tiles[square.index()] = tile;
            let taken = self.stock[mover].take(tile);
            debug_assert!(taken, "{mover} placed a {tile:?} tile with none in stock");
        }

        self.outcome = self.detect_winner();
        if let Some(winner) = self.outcome.winner() {
            trace!(%winner, move_count = self.move_count, "game decided");
        }

        self.to_move = mover.opponent();
        self.move_count += 1;
        self.history.push(self.snapshot());
    }

    /// A player wins by standing on the opponent's home row. Player one is
    /// checked first.
    fn detect_winner(&self) -> Outcome {
        for player in Player::ALL {
            let row = player.goal_row() * BOARD_SIZE;
            if self.pieces[row..row + BOARD_SIZE].contains(&Piece::Owned(player)) {
                return Outcome::Winner(player);
            }
        }
        Outcome::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Placement, Square, Stock, Tile};

    fn sq(x: usize, y: usize) -> Square {
        Square::from_xy(x, y).unwrap()
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "none in stock")]
    fn test_apply_without_stock_panics_in_debug() {
        let mut board = Board::new();
        board.set_stock(Player::One, Stock { black: 0, gray: 1 });
        board.apply(Action::from_parts(sq(2, 4), sq(2, 3), Placement::Black(sq(2, 2))));
    }

    #[test]
    fn test_step_moves_and_places() {
        let mut board = Board::new();
        let action = Action::from_parts(sq(2, 4), sq(2, 3), Placement::Black(sq(2, 4)));

        assert_eq!(board.step(action), Ok(Outcome::Ongoing));
        assert_eq!(board.piece(sq(2, 3)), Piece::Owned(Player::One));
        assert!(board.piece(sq(2, 4)).is_empty());
        assert_eq!(board.tile(sq(2, 4)), Tile::Black);
        assert_eq!(board.stock(Player::One), Stock { black: 2, gray: 1 });
        assert_eq!(board.stock(Player::Two), Stock::INITIAL);
        assert_eq!(board.to_move(), Player::Two);
        assert_eq!(board.move_count(), 1);
        assert_eq!(board.history().len(), 2);
        assert_eq!(board.history().frame(0), Some(&board.snapshot()));
    }

    #[test]
    fn test_step_rejects_illegal() {
        let mut board = Board::new();
        let before = board.clone();
        let action = Action::from_parts(sq(2, 4), sq(2, 2), Placement::None);

        assert_eq!(board.step(action), Err(RulesError::IllegalAction(action)));
        assert_eq!(board, before);
    }

    #[test]
    fn test_step_code_out_of_range() {
        let mut board = Board::new();
        assert_eq!(
            board.step_code(40_000),
            Err(RulesError::InvalidAction(ActionError::OutOfRange(40_000)))
        );
    }

    #[test]
    fn test_win_detection() {
        let mut board = Board::empty();
        board.set_piece(sq(1, 1), Piece::Owned(Player::One));
        board.set_piece(sq(4, 4), Piece::Owned(Player::Two));
        board.set_piece(sq(3, 4), Piece::Owned(Player::One));
        board.reset_history();

        let winning = Action::from_parts(sq(1, 1), sq(1, 0), Placement::None);
        assert_eq!(board.step(winning), Ok(Outcome::Winner(Player::One)));
        assert!(board.is_game_over());
        assert_eq!(board.to_move(), Player::Two);
        assert_eq!(board.move_count(), 1);
        assert!(board.legal_actions().is_empty());

        let any = Action::from_parts(sq(4, 4), sq(4, 3), Placement::None);
        assert_eq!(board.step(any), Err(RulesError::GameOver));
    }

    #[test]
    fn test_player_two_wins_on_bottom_row() {
        let mut board = Board::empty();
        board.set_piece(sq(0, 3), Piece::Owned(Player::Two));
        board.set_piece(sq(4, 1), Piece::Owned(Player::One));
        board.set_to_move(Player::Two);

        let action = Action::from_parts(sq(0, 3), sq(0, 4), Placement::None);
        assert_eq!(board.step(action), Ok(Outcome::Winner(Player::Two)));
    }

    #[test]
    fn test_player_one_checked_first() {
        // Both goals already reached: player one is reported.
        let mut board = Board::empty();
        board.set_piece(sq(2, 2), Piece::Owned(Player::Two));
        board.set_piece(sq(0, 4), Piece::Owned(Player::Two));
        board.set_piece(sq(3, 1), Piece::Owned(Player::One));
        board.set_piece(sq(4, 0), Piece::Owned(Player::One));
        board.set_to_move(Player::Two);

        let action = Action::from_parts(sq(2, 2), sq(2, 1), Placement::None);
        assert_eq!(board.step(action), Ok(Outcome::Winner(Player::One)));
    }

    #[test]
    fn test_placement_consumes_stock() {
        let mut board = Board::new();
        board.set_stock(Player::One, Stock { black: 0, gray: 1 });

        let black = Action::from_parts(sq(0, 4), sq(0, 3), Placement::Black(sq(2, 2)));
        assert_eq!(board.step(black), Err(RulesError::IllegalAction(black)));

        let gray = Action::from_parts(sq(0, 4), sq(0, 3), Placement::Gray(sq(2, 2)));
        assert!(board.step(gray).is_ok());
        assert_eq!(board.stock(Player::One), Stock { black: 0, gray: 0 });
        assert_eq!(board.tile(sq(2, 2)), Tile::Gray);
    }
}
