//! Rules integration and property tests.

use contrast_zero::core::{
    flip_action, flip_cell, Action, Board, GameRng, Outcome, Piece, Placement, Player, Square,
    Tile, ACTION_SPACE, NUM_SQUARES, PIECES_PER_PLAYER,
};
use contrast_zero::rules::RulesError;
use proptest::prelude::*;

fn sq(x: usize, y: usize) -> Square {
    Square::from_xy(x, y).unwrap()
}

/// Play up to `plies` random legal moves, checking invariants after each.
fn random_game(seed: u64, plies: usize) -> Board {
    let mut board = Board::new();
    let mut rng = GameRng::new(seed);

    for _ in 0..plies {
        if board.is_game_over() {
            break;
        }
        let actions = board.legal_actions();
        if actions.is_empty() {
            break;
        }
        let action = actions[rng.gen_range_usize(0..actions.len())];

        let before = board.clone();
        board.step(action).unwrap();
        check_step(&before, &board, action);
    }
    board
}

fn placed_tiles(board: &Board) -> usize {
    Square::all().filter(|&s| board.tile(s) != Tile::White).count()
}

fn check_step(before: &Board, after: &Board, action: Action) {
    for player in Player::ALL {
        assert_eq!(after.pieces_of(player).count(), PIECES_PER_PLAYER);

        let (old, new) = (before.stock(player), after.stock(player));
        assert!(new.black <= old.black && new.gray <= old.gray);
    }

    let stock_total = |b: &Board| -> usize {
        Player::ALL
            .iter()
            .map(|&p| usize::from(b.stock(p).black + b.stock(p).gray))
            .sum()
    };
    assert_eq!(
        placed_tiles(before) + stock_total(before),
        placed_tiles(after) + stock_total(after)
    );

    assert_eq!(after.move_count(), before.move_count() + 1);
    assert_eq!(after.piece(action.from()), Piece::Empty);
    assert_eq!(after.piece(action.to()), Piece::Owned(before.to_move()));
    assert!(after.history().len() <= 8);
    assert_eq!(after.history().frame(0), Some(&after.snapshot()));

    if !after.is_game_over() {
        assert_eq!(after.to_move(), before.to_move().opponent());
    }
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[test]
fn test_opening_move_and_reply() {
    let mut board = Board::new();
    let opening = Action::from_parts(sq(2, 4), sq(2, 3), Placement::Black(sq(2, 2)));

    assert_eq!(board.step(opening), Ok(Outcome::Ongoing));
    assert_eq!(board.to_move(), Player::Two);
    assert_eq!(board.tile(sq(2, 2)), Tile::Black);
    assert_eq!(board.stock(Player::One).black, 2);

    // Player one's piece on c2 is not player two's to move.
    let stolen = Action::from_parts(sq(2, 3), sq(2, 2), Placement::None);
    assert_eq!(board.step(stolen), Err(RulesError::IllegalAction(stolen)));
}

#[test]
fn test_race_to_goal_row() {
    // A lone player-one piece one square from the goal row.
    let mut board = Board::empty();
    board.set_piece(sq(0, 1), Piece::Owned(Player::One));
    board.set_piece(sq(4, 2), Piece::Owned(Player::Two));
    board.reset_history();

    let win = Action::from_parts(sq(0, 1), sq(0, 0), Placement::None);
    assert_eq!(board.step(win), Ok(Outcome::Winner(Player::One)));
    assert!(board.is_game_over());
    assert!(board.legal_actions().is_empty());
    assert_eq!(board.clone().step(win), Err(RulesError::GameOver));
}

#[test]
fn test_random_games_keep_invariants() {
    for seed in 0..20 {
        random_game(seed, 60);
    }
}

#[test]
fn test_step_code_matches_step() {
    let board = Board::new();
    for action in board.legal_actions().into_iter().step_by(11) {
        let mut a = board.clone();
        let mut b = board.clone();
        assert_eq!(a.step(action), b.step_code(u32::from(action.code())));
        assert_eq!(a, b);
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_action_code_round_trip(code in 0u32..ACTION_SPACE as u32) {
        let action = Action::try_from_code(code).unwrap();
        prop_assert_eq!(u32::from(action.code()), code);

        let rebuilt = Action::from_parts(action.from(), action.to(), action.placement());
        prop_assert_eq!(rebuilt, action);
    }

    #[test]
    fn prop_out_of_range_codes_rejected(code in ACTION_SPACE as u32..u32::MAX) {
        prop_assert!(Action::try_from_code(code).is_err());
    }

    #[test]
    fn prop_flip_is_involution(code in 0u32..ACTION_SPACE as u32, cell in 0usize..NUM_SQUARES) {
        let action = Action::try_from_code(code).unwrap();
        prop_assert_eq!(flip_action(flip_action(action)), action);
        prop_assert_eq!(flip_cell(flip_cell(cell)), cell);
        prop_assert_eq!(flip_action(action).placement().tile(), action.placement().tile());
    }

    #[test]
    fn prop_is_legal_matches_enumeration(
        seed in any::<u64>(),
        plies in 0usize..12,
        code in 0u32..ACTION_SPACE as u32,
    ) {
        let board = random_game(seed, plies);
        let action = Action::try_from_code(code).unwrap();
        let listed = !board.is_game_over() && board.legal_actions().contains(&action);
        prop_assert_eq!(board.is_legal(action), listed);
    }

    #[test]
    fn prop_legal_actions_unique_and_legal(seed in any::<u64>(), plies in 0usize..20) {
        let board = random_game(seed, plies);
        let actions = board.legal_actions();

        let mut codes: Vec<u16> = actions.iter().map(|a| a.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        prop_assert_eq!(codes.len(), actions.len());

        for action in actions {
            prop_assert!(board.is_legal(action));
        }
    }
}
