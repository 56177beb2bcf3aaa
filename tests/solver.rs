//! End-to-end solving scenarios through the public API.

use sudoku_solver::puzzle::board::Board;
use sudoku_solver::solver::engine::{Engine, SolveOutcome};

/// Solvable by propagation alone.
const EASY: &str =
    "...8.5.13...2.36..6...9.2.4........5.4.1..7.62563.489.59...71.21.2.8.47...491..38";

const EASY_SOLVED: [[u8; 9]; 9] = [
    [4, 2, 7, 8, 6, 5, 9, 1, 3],
    [9, 1, 5, 2, 4, 3, 6, 8, 7],
    [6, 8, 3, 7, 9, 1, 2, 5, 4],
    [8, 7, 1, 6, 2, 9, 3, 4, 5],
    [3, 4, 9, 1, 5, 8, 7, 2, 6],
    [2, 5, 6, 3, 7, 4, 8, 9, 1],
    [5, 9, 8, 4, 3, 7, 1, 6, 2],
    [1, 3, 2, 5, 8, 6, 4, 7, 9],
    [7, 6, 4, 9, 1, 2, 5, 3, 8],
];

/// Stalls the propagator; the search phase has to finish it.
const HARD: &str =
    "9.54..6.7...9.7...42....91.5.8..........65......1.9.....6..38......8..268..2.634.";

const HARD_SOLVED: [[u8; 9]; 9] = [
    [9, 1, 5, 4, 3, 2, 6, 8, 7],
    [6, 8, 3, 9, 1, 7, 2, 5, 4],
    [4, 2, 7, 6, 5, 8, 9, 1, 3],
    [5, 9, 8, 3, 7, 4, 1, 6, 2],
    [1, 3, 2, 8, 6, 5, 4, 7, 9],
    [7, 6, 4, 1, 2, 9, 5, 3, 8],
    [2, 5, 6, 7, 4, 3, 8, 9, 1],
    [3, 4, 9, 5, 8, 1, 7, 2, 6],
    [8, 7, 1, 2, 9, 6, 3, 4, 5],
];

fn solve(board: Board) -> (SolveOutcome, sudoku_solver::solver::stats::SolveStats) {
    let mut engine = Engine::new(board);
    let outcome = engine.solve();
    (outcome, *engine.stats())
}

#[test]
fn easy_puzzle_needs_no_guesses() {
    let (outcome, stats) = solve(EASY.parse().unwrap());
    assert_eq!(outcome, SolveOutcome::Solved(Board::from(EASY_SOLVED)));
    assert_eq!(stats.guesses, 0);
}

#[test]
fn hard_puzzle_solves_and_preserves_givens() {
    let board: Board = HARD.parse().unwrap();
    let (outcome, stats) = solve(board.clone());

    let SolveOutcome::Solved(solution) = outcome else {
        panic!("hard puzzle must solve, got {:?}", stats);
    };
    assert_eq!(solution, Board::from(HARD_SOLVED));
    assert!(solution.is_valid_solution());
    for r in 0..9 {
        for c in 0..9 {
            if let Some(v) = board.get(r, c) {
                assert_eq!(solution.get(r, c), Some(v), "given at ({r}, {c}) changed");
            }
        }
    }
    assert!(stats.guesses > 0, "hard puzzle should require search");
}

#[test]
fn solving_is_deterministic() {
    let (first, _) = solve(HARD.parse().unwrap());
    let (second, _) = solve(HARD.parse().unwrap());
    assert_eq!(first, second);
}

#[test]
fn complete_valid_grid_comes_back_unchanged() {
    let (outcome, stats) = solve(Board::from(HARD_SOLVED));
    assert_eq!(outcome, SolveOutcome::Solved(Board::from(HARD_SOLVED)));
    assert_eq!(stats.guesses, 0);
}

#[test]
fn duplicated_given_is_contradictory_without_search() {
    let mut rows = [[0u8; 9]; 9];
    rows[4][0] = 3;
    rows[4][8] = 3;
    let (outcome, stats) = solve(Board::from(rows));
    assert_eq!(outcome, SolveOutcome::Contradictory);
    assert_eq!(stats.guesses, 0);
}

#[test]
fn dead_end_without_any_duplicate_is_unsolvable() {
    // Block 0 holds 1..=8 around an open corner, and the only value left for
    // that corner already appears in its row and its column.
    let mut rows = [[0u8; 9]; 9];
    rows[0][1] = 1;
    rows[0][2] = 2;
    rows[1] = [3, 4, 5, 0, 0, 0, 0, 0, 0];
    rows[2] = [6, 7, 8, 0, 0, 0, 0, 0, 0];
    rows[0][5] = 9;
    rows[5][0] = 9;
    let (outcome, _) = solve(Board::from(rows));
    assert_eq!(outcome, SolveOutcome::Unsolvable);
}

#[test]
fn expected_solution_regression_mode() {
    let board: Board = EASY.parse().unwrap();
    let mut engine = Engine::with_expected(board.clone(), Board::from(EASY_SOLVED));
    assert_eq!(
        engine.solve(),
        SolveOutcome::Solved(Board::from(EASY_SOLVED))
    );

    // A wrong expected board makes the true assignments look contradictory,
    // so the solve cannot succeed.
    let mut wrong = EASY_SOLVED;
    wrong.swap(3, 4);
    let mut engine = Engine::with_expected(board, Board::from(wrong));
    assert!(!matches!(engine.solve(), SolveOutcome::Solved(_)));
}

#[test]
fn boards_round_trip_through_display() {
    let board: Board = HARD.parse().unwrap();
    let reparsed: Board = board.to_string().parse().unwrap();
    assert_eq!(reparsed, board);
}
