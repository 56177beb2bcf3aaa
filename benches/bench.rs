use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use sudoku_solver::puzzle::board::Board;
use sudoku_solver::puzzle::state::PuzzleState;
use sudoku_solver::solver::engine::{Engine, SolveOutcome};

/// Solvable by propagation alone.
const EASY: &str =
    "...8.5.13...2.36..6...9.2.4........5.4.1..7.62563.489.59...71.21.2.8.47...491..38";

/// Stalls the propagator and forces backtracking search.
const HARD: &str =
    "9.54..6.7...9.7...42....91.5.8..........65......1.9.....6..38......8..268..2.634.";

fn parse(text: &str) -> Board {
    text.parse().expect("benchmark board must parse")
}

fn bench_solving(c: &mut Criterion) {
    let easy = parse(EASY);
    let hard = parse(HARD);

    let mut group = c.benchmark_group("solve");
    group.sample_size(100);
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("easy - propagation only", |b| {
        b.iter(|| {
            let mut engine = Engine::new(easy.clone());
            let outcome = engine.solve();
            assert!(matches!(outcome, SolveOutcome::Solved(_)));
            black_box(outcome)
        });
    });

    group.bench_function("hard - backtracking search", |b| {
        b.iter(|| {
            let mut engine = Engine::new(hard.clone());
            let outcome = engine.solve();
            assert!(matches!(outcome, SolveOutcome::Solved(_)));
            black_box(outcome)
        });
    });

    group.finish();
}

fn bench_state(c: &mut Criterion) {
    let hard = parse(HARD);

    let mut group = c.benchmark_group("state");
    group.sample_size(100);

    group.bench_function("settle fresh state", |b| {
        b.iter(|| {
            let mut state = PuzzleState::new(hard.clone());
            state.settle().expect("hard puzzle settles cleanly");
            black_box(state)
        });
    });

    let mut settled = PuzzleState::new(hard);
    settled.settle().expect("hard puzzle settles cleanly");

    group.bench_function("clone settled state", |b| {
        b.iter(|| black_box(&settled).clone());
    });

    group.finish();
}

criterion_group!(benches, bench_solving, bench_state);

criterion_main!(benches);
