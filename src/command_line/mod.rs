//! Command-line argument definitions and the solve/report plumbing used by
//! the binary.

pub(crate) mod cli;
