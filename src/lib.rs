#![deny(missing_docs)]
//! A constraint-propagation Sudoku solver.
//!
//! The crate is split in two: the [`puzzle`] module owns the board and the
//! derived candidate bookkeeping, and the [`solver`] module drives
//! propagation to a fixed point followed by backtracking search over cloned
//! puzzle states.

/// The `puzzle` module holds the board representation, candidate sets, and
/// the mutable puzzle state that keeps them consistent.
pub mod puzzle;

/// The `solver` module implements the propagation + backtracking engine.
pub mod solver;
