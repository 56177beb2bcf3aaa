#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Solve statistics.

/// Counters accumulated over a single solve.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SolveStats {
    /// Propagation passes run across every fixed-point computation.
    pub passes: usize,

    /// Speculative assignments made by the search.
    pub guesses: usize,

    /// Branches abandoned because propagation found a contradiction.
    pub conflicts: usize,

    /// Deepest recursion reached by the search.
    pub max_depth: usize,
}
