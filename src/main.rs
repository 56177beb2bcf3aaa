//! # Sudoku Solver
//!
//! A command-line Sudoku solver built on constraint propagation with a
//! backtracking search fallback. The solver keeps redundant candidate
//! structures per row, per column, and per cell, narrows them to a fixed
//! point, and only guesses when deduction stalls.
//!
//! ## Usage
//!
//! ```sh
//! sudoku_solver [GLOBAL_OPTIONS] [SUBCOMMAND]
//! ```
//!
//! ### Global Argument
//!
//! -   `path`: If provided as the *only* argument (without a subcommand),
//!     it's treated as a path to a puzzle file to be solved.
//!
//!     ```sh
//!     sudoku_solver <path_to_puzzle_file>
//!     ```
//!
//! ### Subcommands
//!
//! 1.  **`file`**: Solve a puzzle file.
//!     ```sh
//!     sudoku_solver file --path puzzle.sudoku [--expected solution.sudoku]
//!     ```
//!
//! 2.  **`text`**: Solve a puzzle provided as plain text: 81 cells, `.` or
//!     `0` for unknowns, whitespace ignored.
//!     ```sh
//!     sudoku_solver text --input "53..7....6..195...."
//!     ```
//!
//! 3.  **`batch`**: Solve every `.sudoku` file under a directory.
//!     ```sh
//!     sudoku_solver batch --path puzzles/
//!     ```
//!
//! 4.  **`completions`**: Generate shell completion scripts.
//!
//! ### Common Options
//!
//! -   `-d, --debug`: Enable debug logging of the search (default: `false`).
//! -   `-v, --verify`: Verify the solution against the Sudoku rules and the
//!     original givens (default: `true`).
//! -   `-s, --stats`: Print search statistics (default: `true`).
//!
//! The `--expected` option attaches a known complete solution: any
//! assignment that disagrees with it is treated as a contradiction, which
//! pins down where a solve goes wrong.

use clap::{CommandFactory, Parser};

use crate::command_line::cli::{Cli, Commands, solve_dir, solve_file, solve_text};

mod command_line;

/// Global allocator using `tikv-jemallocator` for potentially better
/// performance and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Main entry point of the Sudoku solver application.
///
/// Parses command-line arguments, dispatches to the appropriate command
/// handler, and manages the overall execution flow.
fn main() {
    let cli = Cli::parse();
    init_logging(cli.common.debug);

    // Handle the case where a path is provided globally without a
    // subcommand. This defaults to solving a single puzzle file.
    if let Some(path) = cli.path.clone()
        && cli.command.is_none()
    {
        if let Err(e) = solve_file(&path, None, &cli.common) {
            eprintln!("{e}");
            std::process::exit(1);
        }
        return;
    }

    let result = match cli.command {
        Some(Commands::File {
            path,
            expected,
            common,
        }) => solve_file(&path, expected.as_ref(), &common),

        Some(Commands::Text {
            input,
            expected,
            common,
        }) => solve_text(&input, expected.as_deref(), &common),

        Some(Commands::Batch { path, common }) => solve_dir(&path, &common),

        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }

        None => {
            eprintln!("No command provided. Use --help for more information.");
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Initializes `env_logger`, respecting `RUST_LOG` but letting `--debug`
/// force debug-level output from the solver.
fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}
