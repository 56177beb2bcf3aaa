#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! The mutable puzzle state.
//!
//! [`PuzzleState`] is the scratch pad a human solver would keep next to the
//! grid: the board itself plus three derived possibility structures — the
//! values still unplaced in each row, the values still unplaced in each
//! column, and the values still legal for each individual cell. Every
//! mutation keeps the four structures consistent, and [`PuzzleState::settle`]
//! is the single entry point through which callers request propagation.
//!
//! Narrowing is monotonic: once a candidate has been excluded it is never
//! re-added, so repeated settling always terminates.

use crate::puzzle::board::{BLOCK, Board, SIZE, block_origin};
use crate::puzzle::candidates::CandidateSet;
use smallvec::SmallVec;
use thiserror::Error;

/// A puzzle invariant was violated.
///
/// This is expected, recoverable control flow during search: the engine
/// catches it at every guess boundary and treats it as "this guess was
/// wrong". Internal structural bugs are debug assertions instead and are
/// never reported through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Contradiction {
    /// An unsolved cell has no candidates left.
    #[error("no candidates left for cell ({row}, {col})")]
    EmptyCell {
        /// Row of the exhausted cell.
        row: usize,
        /// Column of the exhausted cell.
        col: usize,
    },

    /// A value occurs twice in a row.
    #[error("value {value} is duplicated in row {row}")]
    DuplicateInRow {
        /// The offending row.
        row: usize,
        /// The duplicated value.
        value: u8,
    },

    /// A value occurs twice in a column.
    #[error("value {value} is duplicated in column {col}")]
    DuplicateInColumn {
        /// The offending column.
        col: usize,
        /// The duplicated value.
        value: u8,
    },

    /// A value occurs twice in a 3x3 block.
    #[error("value {value} is duplicated in block {block}")]
    DuplicateInBlock {
        /// The offending block, indexed 0..9 row-major.
        block: usize,
        /// The duplicated value.
        value: u8,
    },

    /// An assignment demanded a value the cell can no longer take.
    ///
    /// A singles cascade running under a wrong guess can legitimately reach
    /// this: the last remaining value of a line may already have been
    /// excluded from the line's sole open cell by block exclusion.
    #[error("cell ({row}, {col}) cannot take value {value}")]
    ImpossibleValue {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
        /// The impossible value.
        value: u8,
    },

    /// A row has fewer remaining values than open cells.
    #[error("row {row} has more open cells than remaining values")]
    UnfillableRow {
        /// The offending row.
        row: usize,
    },

    /// A column has fewer remaining values than open cells.
    #[error("column {col} has more open cells than remaining values")]
    UnfillableColumn {
        /// The offending column.
        col: usize,
    },

    /// An assignment disagrees with the expected solution supplied for
    /// verification.
    #[error("cell ({row}, {col}) = {value} disagrees with the expected solution")]
    ExpectedMismatch {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
        /// The assigned value.
        value: u8,
    },
}

/// The board plus the derived row, column, and per-cell candidate sets.
///
/// Cloning produces a deep, independent snapshot; the search engine clones
/// before every speculative guess so a failed branch can be discarded
/// without corrupting its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleState {
    board: Board,
    rows: [CandidateSet; SIZE],
    cols: [CandidateSet; SIZE],
    cells: [[CandidateSet; SIZE]; SIZE],
    expected: Option<Board>,
}

impl PuzzleState {
    /// Builds a state from an initial board, with every candidate open.
    ///
    /// The state is not yet internally consistent: callers must [`settle`]
    /// it (the engine does so before searching), which also surfaces an
    /// immediately contradictory board as an error.
    ///
    /// [`settle`]: PuzzleState::settle
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self::build(board, None)
    }

    /// Like [`PuzzleState::new`], but attaches a complete expected solution.
    ///
    /// Any assignment that disagrees with `expected` is reported as a
    /// [`Contradiction::ExpectedMismatch`]; useful for regression runs
    /// against known solutions.
    #[must_use]
    pub fn with_expected(board: Board, expected: Board) -> Self {
        Self::build(board, Some(expected))
    }

    fn build(board: Board, expected: Option<Board>) -> Self {
        let mut cells = [[CandidateSet::all(); SIZE]; SIZE];
        for (r, row) in cells.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                if let Some(v) = board.get(r, c) {
                    *cell = CandidateSet::singleton(v);
                }
            }
        }
        Self {
            board,
            rows: [CandidateSet::all(); SIZE],
            cols: [CandidateSet::all(); SIZE],
            cells,
            expected,
        }
    }

    /// The value of the given cell, or `None` if unknown.
    #[must_use]
    pub const fn value_at(&self, row: usize, col: usize) -> Option<u8> {
        self.board.get(row, col)
    }

    /// Whether the given cell has a known value.
    #[must_use]
    pub const fn is_solved(&self, row: usize, col: usize) -> bool {
        self.board.get(row, col).is_some()
    }

    /// The values still legal for the given cell.
    #[must_use]
    pub const fn candidates_for_cell(&self, row: usize, col: usize) -> CandidateSet {
        self.cells[row][col]
    }

    /// The values not yet placed in the given row.
    #[must_use]
    pub const fn candidates_for_row(&self, row: usize) -> CandidateSet {
        self.rows[row]
    }

    /// The values not yet placed in the given column.
    #[must_use]
    pub const fn candidates_for_col(&self, col: usize) -> CandidateSet {
        self.cols[col]
    }

    /// A read-only view of the underlying board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Consumes the state, returning the board.
    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }

    /// Whether every cell is solved and the state passes
    /// [`check_consistency`].
    ///
    /// [`check_consistency`]: PuzzleState::check_consistency
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.board.is_filled() && self.check_consistency().is_ok()
    }

    /// Places `value` in the given cell and updates all derived structures.
    ///
    /// The value is removed from the row and column candidate sets, and the
    /// cell's own candidates collapse to the singleton. If either line is
    /// driven down to a single remaining value, the sole open cell in that
    /// line is assigned recursively — the *singles cascade*, bounded by the
    /// 81 cells of the grid.
    ///
    /// # Errors
    ///
    /// Returns a [`Contradiction`] if the cell can no longer take `value`,
    /// if the assignment disagrees with an attached expected solution, or if
    /// the cascade runs into a dead end.
    pub fn assign(&mut self, row: usize, col: usize, value: u8) -> Result<(), Contradiction> {
        if !self.cells[row][col].contains(value) {
            return Err(Contradiction::ImpossibleValue { row, col, value });
        }
        if let Some(expected) = &self.expected
            && expected.get(row, col) != Some(value)
        {
            return Err(Contradiction::ExpectedMismatch { row, col, value });
        }

        debug_assert!(
            self.board.get(row, col).is_none(),
            "assign target ({row}, {col}) is already solved"
        );

        self.board.set(row, col, value);
        self.cells[row][col] = CandidateSet::singleton(value);
        self.remove_row_candidate(row, value)?;
        self.remove_col_candidate(col, value)?;
        Ok(())
    }

    /// Brings all four structures into agreement, in a fixed pass order:
    /// line candidates are derived from solved cells, cell candidates are
    /// narrowed against the line sets, line sets are narrowed against the
    /// cells, and the result is checked for consistency.
    ///
    /// This is the only path by which callers may request propagation; the
    /// individual passes are not exposed.
    ///
    /// # Errors
    ///
    /// Returns the first [`Contradiction`] encountered while narrowing, or
    /// the one found by the final consistency check.
    pub fn settle(&mut self) -> Result<bool, Contradiction> {
        let mut changed = self.sync_lines_from_solved()?;
        changed |= self.narrow_cells_from_lines()?;
        changed |= self.narrow_lines_from_cells()?;
        self.check_consistency()?;
        Ok(changed)
    }

    /// Applies block exclusion: a value known anywhere in a 3x3 block is
    /// removed from the candidates of every unsolved cell in that block. A
    /// cell collapsing to a single candidate is assigned on the spot.
    ///
    /// Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns a [`Contradiction`] if a cell's candidates are exhausted or a
    /// triggered assignment cascades into a dead end.
    pub fn propagate_block_exclusion(&mut self) -> Result<bool, Contradiction> {
        let mut changed = false;
        for block in 0..SIZE {
            let (r0, c0) = block_origin(block);

            let mut known = CandidateSet::empty();
            for r in r0..r0 + BLOCK {
                for c in c0..c0 + BLOCK {
                    if let Some(v) = self.board.get(r, c) {
                        known.insert(v);
                    }
                }
            }
            if known.is_empty() {
                continue;
            }

            for r in r0..r0 + BLOCK {
                for c in c0..c0 + BLOCK {
                    if self.is_solved(r, c) {
                        continue;
                    }
                    let narrowed = self.cells[r][c].difference(known);
                    if narrowed == self.cells[r][c] {
                        continue;
                    }
                    self.cells[r][c] = narrowed;
                    changed = true;
                    if narrowed.is_empty() {
                        return Err(Contradiction::EmptyCell { row: r, col: c });
                    }
                    if let Some(v) = narrowed.sole() {
                        self.assign(r, c, v)?;
                    }
                }
            }
        }
        Ok(changed)
    }

    /// Checks the puzzle invariants that a wrong guess can break: duplicate
    /// values in a row, column, or block, and unsolved cells with no
    /// candidates left.
    ///
    /// Structural invariants that only a coding bug can break (a solved
    /// cell's candidate set not being its singleton, a placed value
    /// lingering in its line sets) are debug assertions.
    ///
    /// # Errors
    ///
    /// Returns the first [`Contradiction`] found.
    pub fn check_consistency(&self) -> Result<(), Contradiction> {
        for row in 0..SIZE {
            let mut seen = CandidateSet::empty();
            for col in 0..SIZE {
                if let Some(value) = self.board.get(row, col) {
                    if seen.contains(value) {
                        return Err(Contradiction::DuplicateInRow { row, value });
                    }
                    seen.insert(value);
                }
            }
        }

        for col in 0..SIZE {
            let mut seen = CandidateSet::empty();
            for row in 0..SIZE {
                if let Some(value) = self.board.get(row, col) {
                    if seen.contains(value) {
                        return Err(Contradiction::DuplicateInColumn { col, value });
                    }
                    seen.insert(value);
                }
            }
        }

        for block in 0..SIZE {
            let (r0, c0) = block_origin(block);
            let mut seen = CandidateSet::empty();
            for r in r0..r0 + BLOCK {
                for c in c0..c0 + BLOCK {
                    if let Some(value) = self.board.get(r, c) {
                        if seen.contains(value) {
                            return Err(Contradiction::DuplicateInBlock { block, value });
                        }
                        seen.insert(value);
                    }
                }
            }
        }

        for row in 0..SIZE {
            for col in 0..SIZE {
                if !self.is_solved(row, col) && self.cells[row][col].is_empty() {
                    return Err(Contradiction::EmptyCell { row, col });
                }
            }
        }

        self.debug_validate();
        Ok(())
    }

    // ==================== narrowing passes ====================

    /// Pass 1: remove every placed value from its row and column candidate
    /// sets, cascading on collapse.
    fn sync_lines_from_solved(&mut self) -> Result<bool, Contradiction> {
        let mut changed = false;
        for r in 0..SIZE {
            for c in 0..SIZE {
                if let Some(v) = self.board.get(r, c) {
                    if self.rows[r].contains(v) {
                        self.remove_row_candidate(r, v)?;
                        changed = true;
                    }
                    if self.cols[c].contains(v) {
                        self.remove_col_candidate(c, v)?;
                        changed = true;
                    }
                }
            }
        }
        Ok(changed)
    }

    /// Pass 2: narrow each unsolved cell by what its row and column still
    /// allow, intersected with the cell's existing candidates so knowledge
    /// is never lost. A cell down to one candidate is assigned (the "naked
    /// single"); solved cells stay pinned to their singleton.
    fn narrow_cells_from_lines(&mut self) -> Result<bool, Contradiction> {
        let mut changed = false;
        for r in 0..SIZE {
            for c in 0..SIZE {
                match self.board.get(r, c) {
                    Some(v) => {
                        let pin = CandidateSet::singleton(v);
                        if self.cells[r][c] != pin {
                            self.cells[r][c] = pin;
                            changed = true;
                        }
                    }
                    None => {
                        let line = self.rows[r].union(self.cols[c]);
                        let narrowed = self.cells[r][c].intersection(line);
                        if narrowed == self.cells[r][c] {
                            continue;
                        }
                        self.cells[r][c] = narrowed;
                        changed = true;
                        if narrowed.is_empty() {
                            return Err(Contradiction::EmptyCell { row: r, col: c });
                        }
                        if let Some(v) = narrowed.sole() {
                            self.assign(r, c, v)?;
                        }
                    }
                }
            }
        }
        Ok(changed)
    }

    /// Pass 3: narrow each line's candidate set by the union of what its
    /// unsolved cells can still take, cascading on collapse.
    fn narrow_lines_from_cells(&mut self) -> Result<bool, Contradiction> {
        let mut changed = false;

        for r in 0..SIZE {
            let mut open = CandidateSet::empty();
            for c in 0..SIZE {
                if !self.is_solved(r, c) {
                    open = open.union(self.cells[r][c]);
                }
            }
            let narrowed = self.rows[r].intersection(open);
            if narrowed != self.rows[r] {
                self.rows[r] = narrowed;
                changed = true;
                self.collapse_row(r)?;
            }
        }

        for c in 0..SIZE {
            let mut open = CandidateSet::empty();
            for r in 0..SIZE {
                if !self.is_solved(r, c) {
                    open = open.union(self.cells[r][c]);
                }
            }
            let narrowed = self.cols[c].intersection(open);
            if narrowed != self.cols[c] {
                self.cols[c] = narrowed;
                changed = true;
                self.collapse_col(c)?;
            }
        }

        Ok(changed)
    }

    // ==================== singles cascade ====================

    fn remove_row_candidate(&mut self, row: usize, value: u8) -> Result<(), Contradiction> {
        if self.rows[row].remove(value) {
            self.collapse_row(row)?;
        }
        Ok(())
    }

    fn remove_col_candidate(&mut self, col: usize, value: u8) -> Result<(), Contradiction> {
        if self.cols[col].remove(value) {
            self.collapse_col(col)?;
        }
        Ok(())
    }

    /// If the row's candidate set has collapsed, resolve it against the
    /// row's open cells. The collapse condition is derived from the data
    /// model invariant rather than from the candidate set's size alone:
    /// exactly one open cell takes the sole remaining value; more open cells
    /// than remaining values is a contradiction; a leftover value with no
    /// open cell belongs to a solved cell whose line sync is still pending
    /// within the current pass, and resolves by the end of it.
    fn collapse_row(&mut self, row: usize) -> Result<(), Contradiction> {
        let open: SmallVec<[usize; SIZE]> =
            (0..SIZE).filter(|&c| !self.is_solved(row, c)).collect();

        if self.rows[row].is_empty() {
            if open.is_empty() {
                return Ok(());
            }
            return Err(Contradiction::UnfillableRow { row });
        }
        let Some(value) = self.rows[row].sole() else {
            return Ok(());
        };
        match open[..] {
            [] => Ok(()),
            [col] => self.assign(row, col, value),
            _ => Err(Contradiction::UnfillableRow { row }),
        }
    }

    fn collapse_col(&mut self, col: usize) -> Result<(), Contradiction> {
        let open: SmallVec<[usize; SIZE]> =
            (0..SIZE).filter(|&r| !self.is_solved(r, col)).collect();

        if self.cols[col].is_empty() {
            if open.is_empty() {
                return Ok(());
            }
            return Err(Contradiction::UnfillableColumn { col });
        }
        let Some(value) = self.cols[col].sole() else {
            return Ok(());
        };
        match open[..] {
            [] => Ok(()),
            [row] => self.assign(row, col, value),
            _ => Err(Contradiction::UnfillableColumn { col }),
        }
    }

    /// Structural invariants; violations are bugs, not bad guesses.
    fn debug_validate(&self) {
        if cfg!(debug_assertions) {
            for r in 0..SIZE {
                for c in 0..SIZE {
                    if let Some(v) = self.board.get(r, c) {
                        debug_assert_eq!(
                            self.cells[r][c].sole(),
                            Some(v),
                            "solved cell ({r}, {c}) candidates do not match its value"
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(text: &str) -> Board {
        text.parse().expect("test board must parse")
    }

    /// The easy reference puzzle: solvable by propagation alone.
    const EASY: &str =
        "...8.5.13...2.36..6...9.2.4........5.4.1..7.62563.489.59...71.21.2.8.47...491..38";

    #[test]
    fn fresh_state_settles_consistently() {
        let mut state = PuzzleState::new(parsed(EASY));
        assert!(state.settle().is_ok());

        // row 5 has seven givens, leaving exactly {1, 7} unplaced
        let row = state.candidates_for_row(5);
        assert_eq!(row.len(), 2);
        assert!(row.contains(1) && row.contains(7));
        assert!(!row.contains(2));

        // 1 and 5 appear in both row 0 and column 0, so cell (0, 0) has
        // lost them; the values placed in only one of its lines remain
        let cell = state.candidates_for_cell(0, 0);
        assert!(!cell.contains(1) && !cell.contains(5));
        assert!(cell.contains(4));
    }

    #[test]
    fn assign_updates_all_structures() {
        let mut state = PuzzleState::new(Board::empty());
        state.settle().unwrap();
        state.assign(0, 0, 5).unwrap();

        assert_eq!(state.value_at(0, 0), Some(5));
        assert_eq!(state.candidates_for_cell(0, 0).sole(), Some(5));
        assert!(!state.candidates_for_row(0).contains(5));
        assert!(!state.candidates_for_col(0).contains(5));
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn assign_rejects_excluded_value() {
        let mut state = PuzzleState::new(Board::empty());
        state.settle().unwrap();
        state.assign(0, 0, 5).unwrap();
        state.settle().unwrap();

        // 5 is already placed in the block, so block exclusion removes it
        state.propagate_block_exclusion().unwrap();
        let err = state.assign(1, 1, 5).unwrap_err();
        assert_eq!(
            err,
            Contradiction::ImpossibleValue {
                row: 1,
                col: 1,
                value: 5
            }
        );
    }

    #[test]
    fn singles_cascade_fills_last_cell_of_row() {
        let mut rows = [[0u8; 9]; 9];
        rows[0] = [1, 2, 3, 4, 5, 6, 7, 8, 0];
        let mut state = PuzzleState::new(Board::from(rows));
        state.settle().unwrap();
        assert_eq!(state.value_at(0, 8), Some(9));
    }

    #[test]
    fn duplicate_given_is_a_contradiction() {
        let mut rows = [[0u8; 9]; 9];
        rows[0][0] = 5;
        rows[0][4] = 5;
        let mut state = PuzzleState::new(Board::from(rows));
        assert_eq!(
            state.settle(),
            Err(Contradiction::DuplicateInRow { row: 0, value: 5 })
        );
    }

    #[test]
    fn block_exclusion_removes_known_values() {
        let mut rows = [[0u8; 9]; 9];
        rows[0][0] = 7;
        let mut state = PuzzleState::new(Board::from(rows));
        state.settle().unwrap();

        assert!(state.candidates_for_cell(1, 1).contains(7));
        state.propagate_block_exclusion().unwrap();
        assert!(!state.candidates_for_cell(1, 1).contains(7));
        // cells outside the block are untouched by this rule
        assert!(state.candidates_for_cell(4, 4).contains(7));
    }

    #[test]
    fn clones_are_independent() {
        let mut parent = PuzzleState::new(parsed(EASY));
        parent.settle().unwrap();
        let before = parent.clone();

        let mut child = parent.clone();
        let (r, c) = (0..SIZE)
            .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
            .find(|&(r, c)| !child.is_solved(r, c))
            .expect("easy puzzle has open cells after one settle");
        let guess = child.candidates_for_cell(r, c).iter().next().unwrap();
        child.assign(r, c, guess).unwrap();

        assert_eq!(parent, before, "mutating a clone must not touch the parent");
    }

    #[test]
    fn settling_only_shrinks_candidates() {
        let mut state = PuzzleState::new(parsed(EASY));
        let before: Vec<CandidateSet> = (0..SIZE)
            .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
            .map(|(r, c)| state.candidates_for_cell(r, c))
            .collect();

        state.settle().unwrap();
        state.propagate_block_exclusion().unwrap();

        for (i, (r, c)) in (0..SIZE)
            .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
            .enumerate()
        {
            assert!(
                state.candidates_for_cell(r, c).is_subset(before[i]),
                "candidates for ({r}, {c}) grew back"
            );
        }
    }

    #[test]
    fn expected_solution_mismatch_fails_assignment() {
        let mut expected_rows = [[0u8; 9]; 9];
        expected_rows[0] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        // fill the rest so the expected board is complete; contents beyond
        // row 0 are irrelevant to this test
        for r in 1..9 {
            for c in 0..9 {
                expected_rows[r][c] = u8::try_from((r + c) % 9 + 1).unwrap();
            }
        }
        let mut state = PuzzleState::with_expected(Board::empty(), Board::from(expected_rows));
        state.settle().unwrap();

        assert!(state.assign(0, 0, 1).is_ok());
        assert_eq!(
            state.assign(0, 1, 9),
            Err(Contradiction::ExpectedMismatch {
                row: 0,
                col: 1,
                value: 9
            })
        );
    }
}
