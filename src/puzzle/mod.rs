#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Board representation and the candidate-tracking puzzle state.

/// The 9x9 board of known values, with parsing and formatting.
pub mod board;

/// Candidate sets over the digits 1..=9, stored as bitmasks.
pub mod candidates;

/// The mutable puzzle state: the board plus the derived row, column, and
/// per-cell candidate structures.
pub mod state;
