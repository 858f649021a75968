//! MCTS integration tests.

use contrast_zero::core::{Board, GameRng, Outcome, Piece, Placement, Player, Square, Tile};
use contrast_zero::mcts::{MCTSConfig, MCTSNode, MCTSSearch, SearchError, SelectionPolicy, PUCT};
use contrast_zero::nn::{ConstantOracle, EncodedState, Oracle, OracleError, OracleOutput, UniformOracle};

fn sq(x: usize, y: usize) -> Square {
    Square::from_xy(x, y).unwrap()
}

/// Counts oracle calls.
#[derive(Default)]
struct CountingOracle {
    calls: std::sync::atomic::AtomicUsize,
}

impl Oracle for CountingOracle {
    fn evaluate(&self, encoded: &EncodedState) -> Result<OracleOutput, OracleError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        UniformOracle.evaluate(encoded)
    }
}

// =============================================================================
// Basic Search Tests
// =============================================================================

#[test]
fn test_mcts_returns_legal_action() {
    let board = Board::new();
    let mut search = MCTSSearch::new(UniformOracle, MCTSConfig::default());

    let result = search.search(&board, 100).unwrap();
    let action = result.best_action().expect("opening has legal actions");

    assert!(board.is_legal(action));
    assert_eq!(result.total_visits, 100);
}

#[test]
fn test_policy_follows_legal_order() {
    let board = Board::new();
    let mut search = MCTSSearch::new(UniformOracle, MCTSConfig::for_evaluation());
    let result = search.search(&board, 10).unwrap();

    let actions: Vec<_> = result.policy.iter().map(|&(a, _)| a).collect();
    assert_eq!(actions, board.legal_actions());
    let valued: Vec<_> = result.values.iter().map(|&(a, _)| a).collect();
    assert_eq!(valued, actions);
}

#[test]
fn test_one_oracle_call_per_expansion() {
    let oracle = CountingOracle::default();
    let mut search = MCTSSearch::new(&oracle, MCTSConfig::for_evaluation());

    search.search(&Board::new(), 30).unwrap();

    let calls = oracle.calls.load(std::sync::atomic::Ordering::Relaxed);
    assert_eq!(calls as u32, search.stats().nodes_expanded);
    assert_eq!(calls, search.tree().len());
}

#[test]
fn test_game_over_root_skips_oracle() {
    let oracle = CountingOracle::default();
    let mut board = Board::new();
    board.set_outcome(Outcome::Winner(Player::Two));

    let mut search = MCTSSearch::new(&oracle, MCTSConfig::default());
    let result = search.search(&board, 20).unwrap();

    assert!(result.is_empty());
    assert_eq!(oracle.calls.load(std::sync::atomic::Ordering::Relaxed), 0);
}

// =============================================================================
// Tactical Tests
// =============================================================================

#[test]
fn test_finds_immediate_win_for_player_two() {
    // Player two on d2 (x=3, y=3) steps onto row 4.
    let mut board = Board::empty();
    board.set_piece(sq(3, 3), Piece::Owned(Player::Two));
    board.set_piece(sq(0, 2), Piece::Owned(Player::One));
    board.set_to_move(Player::Two);
    board.reset_history();

    let mut search = MCTSSearch::new(UniformOracle, MCTSConfig::for_evaluation());
    let result = search.search(&board, 400).unwrap();
    let best = result.best_action().unwrap();

    assert_eq!(best.to(), sq(3, 4));
    assert_eq!(result.value(best), Some(1.0));

    let mut next = board.clone();
    assert_eq!(next.step(best), Ok(Outcome::Winner(Player::Two)));
}

#[test]
fn test_gray_tile_piece_sees_diagonals() {
    let mut board = Board::empty();
    board.set_piece(sq(2, 2), Piece::Owned(Player::One));
    board.set_tile(sq(2, 2), Tile::Gray);
    board.set_piece(sq(4, 2), Piece::Owned(Player::Two));
    board.reset_history();

    let mut search = MCTSSearch::new(UniformOracle, MCTSConfig::for_evaluation());
    let result = search.search(&board, 1).unwrap();

    let destinations: std::collections::BTreeSet<_> =
        result.policy.iter().map(|&(a, _)| a.to()).collect();
    assert_eq!(destinations.len(), 8);
}

// =============================================================================
// Determinism and Persistence
// =============================================================================

#[test]
fn test_mcts_deterministic_with_seed() {
    let config = MCTSConfig::default().with_seed(12345);
    let board = Board::new();

    let mut a = MCTSSearch::new(UniformOracle, config.clone());
    let mut b = MCTSSearch::new(UniformOracle, config);

    assert_eq!(a.search(&board, 80).unwrap(), b.search(&board, 80).unwrap());
}

#[test]
fn test_tree_reused_along_game() {
    let mut board = Board::new();
    let mut search = MCTSSearch::new(UniformOracle, MCTSConfig::for_evaluation());

    let first = search.search(&board, 200).unwrap();
    let action = first.best_action().unwrap();
    let child_visits = first.policy.iter().find(|&&(a, _)| a == action).map(|&(_, p)| p).unwrap()
        * first.total_visits as f32;

    board.step(action).unwrap();
    let second = search.search(&board, 10).unwrap();

    // The child already holds the visits it got as part of the first search.
    assert!(second.total_visits >= 10);
    assert!(second.total_visits as f32 + 1.0 >= child_visits);
}

#[test]
fn test_sample_action_respects_zero_probability() {
    let board = Board::new();
    let mut search = MCTSSearch::new(UniformOracle, MCTSConfig::for_evaluation());
    let result = search.search(&board, 3).unwrap();

    let mut rng = GameRng::new(0);
    for _ in 0..20 {
        let action = result.sample_action(&mut rng).unwrap();
        assert!(result.probability(action) > 0.0);
    }
}

// =============================================================================
// Oracle Integration
// =============================================================================

#[test]
fn test_biased_oracle_shapes_visits() {
    // Favour the move-only placement head.
    let oracle = ConstantOracle::new().with_tile_logit(0, 8.0);
    let board = Board::new();
    let mut search = MCTSSearch::new(oracle, MCTSConfig::for_evaluation());

    let result = search.search(&board, 200).unwrap();
    let best = result.best_action().unwrap();

    assert_eq!(best.placement(), Placement::None);
}

#[test]
fn test_malformed_oracle_output_is_error() {
    let bad = OracleOutput {
        move_logits: vec![0.0; 3],
        tile_logits: vec![0.0; 51],
        value: 0.0,
    };
    let oracle = ConstantOracle::new().with_output(bad);
    let mut search = MCTSSearch::new(oracle, MCTSConfig::default());

    let err = search.search(&Board::new(), 5).unwrap_err();
    assert!(matches!(err, SearchError::Oracle(OracleError::MalformedOutput(_))));
}

#[test]
fn test_out_of_range_value_is_error() {
    let mut search = MCTSSearch::new(ConstantOracle::new().with_value(2.0), MCTSConfig::default());

    let err = search.search(&Board::new(), 5).unwrap_err();
    assert!(matches!(err, SearchError::Oracle(OracleError::MalformedOutput(_))));
}

#[test]
fn test_huge_logits_keep_priors_finite() {
    let huge = OracleOutput {
        move_logits: vec![3.0e38; 625],
        tile_logits: vec![3.0e38; 51],
        value: 0.0,
    };
    let oracle = ConstantOracle::new().with_output(huge);
    let board = Board::new();
    let mut search = MCTSSearch::new(oracle, MCTSConfig::for_evaluation());

    let result = search.search(&board, 20).unwrap();
    let root = search.tree().lookup(&board.key()).unwrap();

    assert!(search.tree().get(root).edges.iter().all(|e| e.prior.is_finite()));
    // Equal priors spread the visits instead of piling them on edge 0.
    assert!(result.policy[0].1 < 1.0);
}

// =============================================================================
// Selection Policies
// =============================================================================

/// Always follows the last edge.
struct LastEdge;

impl SelectionPolicy for LastEdge {
    fn select(&self, node: &MCTSNode, _config: &MCTSConfig) -> Option<usize> {
        node.edges.len().checked_sub(1)
    }
}

#[test]
fn test_custom_selection_policy() {
    let board = Board::new();
    let mut search =
        MCTSSearch::new(UniformOracle, MCTSConfig::for_evaluation()).with_selection(LastEdge);

    let result = search.search(&board, 5).unwrap();
    let last = *board.legal_actions().last().unwrap();

    assert_eq!(result.best_action(), Some(last));
    assert_eq!(result.probability(last), 1.0);
}

#[test]
fn test_puct_is_default() {
    let node = MCTSNode::new(Player::One, 0.0, Vec::new());
    assert_eq!(PUCT.select(&node, &MCTSConfig::default()), None);
}
