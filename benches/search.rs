//! Move generation and search benchmarks.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure:
//! - Legal-action enumeration on opening and tiled positions
//! - Board cloning plus a checked step
//! - Feature encoding
//! - Full MCTS search with varying simulation counts

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use contrast_zero::core::{Board, GameRng};
use contrast_zero::mcts::{MCTSConfig, MCTSSearch};
use contrast_zero::nn::UniformOracle;

/// A position a few random moves into the game, with tiles on the board.
fn midgame(seed: u64, plies: usize) -> Board {
    let mut board = Board::new();
    let mut rng = GameRng::new(seed);
    for _ in 0..plies {
        let actions = board.legal_actions();
        if actions.is_empty() || board.is_game_over() {
            break;
        }
        let action = actions[rng.gen_range_usize(0..actions.len())];
        if board.step(action).is_err() {
            break;
        }
    }
    board
}

// =============================================================================
// Rules Benchmarks
// =============================================================================

fn bench_legal_actions(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal_actions");

    let opening = Board::new();
    group.bench_function("opening", |b| b.iter(|| black_box(opening.legal_actions())));

    let mid = midgame(7, 6);
    group.bench_function("midgame", |b| b.iter(|| black_box(mid.legal_actions())));

    group.finish();
}

fn bench_clone_and_step(c: &mut Criterion) {
    let board = Board::new();
    let action = board.legal_actions()[0];

    c.bench_function("clone_and_step", |b| {
        b.iter(|| {
            let mut next = board.clone();
            black_box(next.step(action).ok())
        })
    });
}

fn bench_encode(c: &mut Criterion) {
    let board = midgame(3, 10);
    c.bench_function("encode_state", |b| b.iter(|| black_box(board.encode_state())));
}

// =============================================================================
// Search Benchmarks
// =============================================================================

fn bench_search_simulations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_simulations");
    group.sample_size(20);

    for sims in [50u32, 200, 800] {
        group.throughput(Throughput::Elements(u64::from(sims)));
        group.bench_with_input(BenchmarkId::new("opening", sims), &sims, |b, &sims| {
            let board = Board::new();
            b.iter(|| {
                let mut search = MCTSSearch::new(UniformOracle, MCTSConfig::default());
                black_box(search.search(&board, sims).ok())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_legal_actions,
    bench_clone_and_step,
    bench_encode,
    bench_search_simulations
);
criterion_main!(benches);
