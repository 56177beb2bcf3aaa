#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! The propagation + backtracking engine.
//!
//! Solving proceeds in two phases. Propagation interleaves the state's own
//! settling with two engine-level deductions — assigning cells whose row and
//! column candidates intersect in a single value, and block exclusion —
//! until a full pass changes nothing. If propagation alone does not finish
//! the puzzle, the engine picks the first open cell, clones the state, and
//! tries each remaining candidate in ascending order, recursing on the
//! clone. A contradiction anywhere in a branch discards that clone and moves
//! on to the next candidate; the original state is never corrupted, so no
//! undo machinery is needed.
//!
//! Candidate iteration is ascending and the open-cell scan is row-major, so
//! the search is fully deterministic and returns the first solution it
//! finds.

use crate::puzzle::board::{Board, SIZE};
use crate::puzzle::state::{Contradiction, PuzzleState};
use crate::solver::stats::SolveStats;

/// The result of running the engine on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A completed, valid board.
    Solved(Board),

    /// The initial board was consistent, but the search exhausted every
    /// branch without completing it.
    Unsolvable,

    /// The initial board already violated a puzzle invariant before any
    /// search began.
    Contradictory,
}

/// Drives a [`PuzzleState`] to a solution.
pub struct Engine {
    state: PuzzleState,
    stats: SolveStats,
}

impl Engine {
    /// Creates an engine for the given starting board.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            state: PuzzleState::new(board),
            stats: SolveStats::default(),
        }
    }

    /// Creates an engine that verifies every assignment against a known
    /// complete solution.
    #[must_use]
    pub fn with_expected(board: Board, expected: Board) -> Self {
        Self {
            state: PuzzleState::with_expected(board, expected),
            stats: SolveStats::default(),
        }
    }

    /// Counters for the most recent [`solve`](Engine::solve).
    #[must_use]
    pub const fn stats(&self) -> &SolveStats {
        &self.stats
    }

    /// Runs propagation and, if needed, backtracking search.
    ///
    /// The first solution found is returned; candidates are tried in
    /// ascending order, so the result is deterministic.
    pub fn solve(&mut self) -> SolveOutcome {
        self.stats = SolveStats::default();

        let mut root = self.state.clone();
        if let Err(contradiction) = root.settle() {
            log::debug!("board contradictory before search: {contradiction}");
            return SolveOutcome::Contradictory;
        }

        self.search(root, 0).map_or(SolveOutcome::Unsolvable, |solved| {
            SolveOutcome::Solved(solved.into_board())
        })
    }

    /// Recursive backtracking over cloned states.
    ///
    /// Each level first propagates to a fixed point; a contradiction means
    /// this branch is dead and `None` is returned to the caller, which
    /// simply drops the clone. Otherwise the first open cell's candidates
    /// are tried in ascending order.
    fn search(&mut self, mut state: PuzzleState, depth: usize) -> Option<PuzzleState> {
        self.stats.max_depth = self.stats.max_depth.max(depth);

        match Self::propagate_to_fixpoint(&mut state) {
            Ok(passes) => {
                self.stats.passes += passes;
                log::trace!("fixed point after {passes} passes at depth {depth}");
            }
            Err(contradiction) => {
                self.stats.conflicts += 1;
                log::debug!("dead branch at depth {depth}: {contradiction}");
                return None;
            }
        }

        if state.is_complete() {
            return Some(state);
        }

        let (row, col) = Self::first_open_cell(&state)?;
        for guess in state.candidates_for_cell(row, col) {
            self.stats.guesses += 1;
            log::debug!("guessing {guess} at ({row}, {col}), depth {depth}");

            let mut child = state.clone();
            if let Err(contradiction) = child.assign(row, col, guess) {
                self.stats.conflicts += 1;
                log::debug!("guess {guess} at ({row}, {col}) rejected: {contradiction}");
                continue;
            }
            if let Some(solved) = self.search(child, depth + 1) {
                return Some(solved);
            }
        }
        None
    }

    /// Runs all propagation rules until a complete pass changes nothing,
    /// returning the number of passes.
    ///
    /// The state is settled to quiescence up front and again after any
    /// engine-level deduction fires, so line narrowing always feeds back
    /// into cell narrowing before the next rule runs.
    ///
    /// # Errors
    ///
    /// Returns the first [`Contradiction`] any rule encounters.
    fn propagate_to_fixpoint(state: &mut PuzzleState) -> Result<usize, Contradiction> {
        while state.settle()? {}

        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;

            if Self::assign_sole_intersections(state)? {
                changed = true;
            }
            if state.propagate_block_exclusion()? {
                changed = true;
            }

            if !changed {
                return Ok(passes);
            }
            while state.settle()? {}
        }
    }

    /// Assigns every open cell whose row and column candidates intersect in
    /// exactly one value. An empty intersection is a contradiction: the cell
    /// cannot satisfy both of its lines.
    fn assign_sole_intersections(state: &mut PuzzleState) -> Result<bool, Contradiction> {
        let mut changed = false;
        for row in 0..SIZE {
            for col in 0..SIZE {
                if state.is_solved(row, col) {
                    continue;
                }
                let both = state
                    .candidates_for_row(row)
                    .intersection(state.candidates_for_col(col));
                if both.is_empty() {
                    return Err(Contradiction::EmptyCell { row, col });
                }
                if let Some(value) = both.sole() {
                    state.assign(row, col, value)?;
                    changed = true;
                }
            }
        }
        Ok(changed)
    }

    fn first_open_cell(state: &PuzzleState) -> Option<(usize, usize)> {
        (0..SIZE)
            .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
            .find(|&(r, c)| !state.is_solved(r, c))
    }
}
