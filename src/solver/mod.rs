#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! The solving engine: propagation to a fixed point, then backtracking
//! search over cloned puzzle states.

/// The engine itself and the outcome of a solve.
pub mod engine;

/// Counters describing the work a solve performed.
pub mod stats;
