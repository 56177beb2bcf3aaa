#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! The 9x9 board of known values.
//!
//! The board is the single source of truth for what is known: each cell is
//! either a placed digit 1..=9 or unknown. Boards can be built from array
//! literals (0 meaning unknown), parsed from an 81-character string
//! (`.`/`0` meaning unknown, whitespace ignored), or read from a file.

use itertools::Itertools;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Side length of the board.
pub const SIZE: usize = 9;

/// Side length of a 3x3 block.
pub const BLOCK: usize = 3;

/// An error produced while parsing a board from text or a file.
#[derive(Debug, Error)]
pub enum ParseBoardError {
    /// The underlying file could not be read.
    #[error("failed to read board file: {0}")]
    Io(#[from] std::io::Error),

    /// The input did not contain exactly 81 cell characters.
    #[error("expected 81 cell characters, got {got}")]
    BadLength {
        /// Number of non-whitespace characters found.
        got: usize,
    },

    /// A cell character was not a digit, `.`, or `0`.
    #[error("invalid cell character {ch:?} at position {index}")]
    BadCell {
        /// Offset of the offending character among the cell characters.
        index: usize,
        /// The offending character.
        ch: char,
    },
}

/// A 9x9 grid of optional digits 1..=9 (`None` = unknown).
#[derive(Clone, PartialEq, Eq)]
pub struct Board([[Option<u8>; SIZE]; SIZE]);

impl Board {
    /// A board with every cell unknown.
    #[must_use]
    pub const fn empty() -> Self {
        Self([[None; SIZE]; SIZE])
    }

    /// The value of the given cell, or `None` if it is unknown.
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.0[row][col]
    }

    /// Places `value` in the given cell.
    pub const fn set(&mut self, row: usize, col: usize, value: u8) {
        debug_assert!(value >= 1 && value <= 9);
        self.0[row][col] = Some(value);
    }

    /// Whether every cell has a known value.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.0.iter().flatten().all(Option::is_some)
    }

    /// Number of cells with a known value.
    #[must_use]
    pub fn solved_cells(&self) -> usize {
        self.0.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Whether the board is completely filled and every row, column, and
    /// block contains each of 1..=9 exactly once.
    #[must_use]
    pub fn is_valid_solution(&self) -> bool {
        let complete = |mut values: [bool; SIZE + 1]| -> bool {
            values[0] = true;
            values.iter().all(|&seen| seen)
        };

        for r in 0..SIZE {
            let mut seen = [false; SIZE + 1];
            for c in 0..SIZE {
                match self.0[r][c] {
                    Some(v) => seen[v as usize] = true,
                    None => return false,
                }
            }
            if !complete(seen) {
                return false;
            }
        }

        for c in 0..SIZE {
            let mut seen = [false; SIZE + 1];
            for r in 0..SIZE {
                if let Some(v) = self.0[r][c] {
                    seen[v as usize] = true;
                }
            }
            if !complete(seen) {
                return false;
            }
        }

        for block in 0..SIZE {
            let (r0, c0) = block_origin(block);
            let mut seen = [false; SIZE + 1];
            for r in r0..r0 + BLOCK {
                for c in c0..c0 + BLOCK {
                    if let Some(v) = self.0[r][c] {
                        seen[v as usize] = true;
                    }
                }
            }
            if !complete(seen) {
                return false;
            }
        }

        true
    }

    /// Cells where this board disagrees with `expected`, as
    /// `(row, col, actual, expected)` tuples.
    #[must_use]
    pub fn diff(&self, expected: &Self) -> Vec<(usize, usize, Option<u8>, Option<u8>)> {
        let mut mismatches = Vec::new();
        for r in 0..SIZE {
            for c in 0..SIZE {
                if self.0[r][c] != expected.0[r][c] {
                    mismatches.push((r, c, self.0[r][c], expected.0[r][c]));
                }
            }
        }
        mismatches
    }

    /// Reads and parses a board file.
    ///
    /// The file must contain exactly 81 cell characters (digits, `.` or `0`
    /// for unknowns); whitespace is ignored, so grids may be laid out one row
    /// per line.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseBoardError`] if the file cannot be read or its
    /// contents do not form a valid board.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ParseBoardError> {
        let contents = std::fs::read_to_string(path)?;
        contents.parse()
    }
}

/// Top-left cell of the given block (blocks indexed 0..9, row-major).
#[must_use]
pub const fn block_origin(block: usize) -> (usize, usize) {
    ((block / BLOCK) * BLOCK, (block % BLOCK) * BLOCK)
}

impl From<[[u8; SIZE]; SIZE]> for Board {
    /// Builds a board from a digit literal, with `0` meaning unknown.
    fn from(rows: [[u8; SIZE]; SIZE]) -> Self {
        let mut board = Self::empty();
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v != 0 {
                    board.set(r, c, v);
                }
            }
        }
        board
    }
}

impl From<&Board> for [[u8; SIZE]; SIZE] {
    fn from(board: &Board) -> Self {
        let mut rows = [[0; SIZE]; SIZE];
        for r in 0..SIZE {
            for c in 0..SIZE {
                rows[r][c] = board.0[r][c].unwrap_or(0);
            }
        }
        rows
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, ParseBoardError> {
        let cells: Vec<char> = s.chars().filter(|ch| !ch.is_whitespace()).collect();
        if cells.len() != SIZE * SIZE {
            return Err(ParseBoardError::BadLength { got: cells.len() });
        }

        let mut board = Self::empty();
        for (index, &ch) in cells.iter().enumerate() {
            match ch {
                '.' | '0' => {}
                '1'..='9' => {
                    #[allow(clippy::cast_possible_truncation)]
                    let value = ch as u8 - b'0';
                    board.set(index / SIZE, index % SIZE, value);
                }
                _ => return Err(ParseBoardError::BadCell { index, ch }),
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.0.iter().enumerate() {
            let line = row
                .chunks(BLOCK)
                .map(|chunk| {
                    chunk
                        .iter()
                        .map(|cell| cell.map_or('.', |v| (b'0' + v) as char))
                        .join(" ")
                })
                .join("  ");
            writeln!(f, "{line}")?;
            if (r + 1) % BLOCK == 0 && r + 1 < SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
