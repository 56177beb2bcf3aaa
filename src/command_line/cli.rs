#![allow(clippy::cast_precision_loss)]

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sudoku_solver::puzzle::board::Board;
use sudoku_solver::solver::engine::{Engine, SolveOutcome};
use sudoku_solver::solver::stats::SolveStats;
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the Sudoku solver application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "sudoku_solver",
    version,
    about = "A constraint-propagation Sudoku solver"
)]
pub(crate) struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// it's treated as the path to a puzzle file to solve.
    #[arg(global = true)]
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `text`, `batch`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands for the Sudoku solver.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a puzzle file.
    File {
        /// Path to the puzzle file: 81 cells as digits, with `.` or `0` for
        /// unknowns; whitespace is ignored.
        #[arg(long)]
        path: PathBuf,

        /// Optional path to a complete solution to check assignments
        /// against while solving.
        #[arg(long)]
        expected: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a puzzle provided as plain text.
    Text {
        /// Literal puzzle input as a string of 81 cells (e.g.
        /// "53..7....6..195...."), with `.` or `0` for unknowns.
        #[arg(short, long)]
        input: String,

        /// Optional complete solution, in the same format, to check
        /// assignments against while solving.
        #[arg(long)]
        expected: Option<String>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every puzzle file in a directory.
    Batch {
        /// Directory to walk; every `.sudoku` file found is solved.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CommonOptions {
    /// Enable debug output, providing more verbose logging during the
    /// solving process.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Enable verification of the found solution. If a solution is found,
    /// it's checked against the Sudoku rules and the original givens.
    #[arg(short, long, default_value_t = true)]
    pub(crate) verify: bool,

    /// Enable printing of performance and search statistics after solving.
    #[arg(short, long, default_value_t = true)]
    pub(crate) stats: bool,
}

/// Solves a puzzle file and reports the outcome.
///
/// # Errors
///
/// If the file doesn't exist or doesn't parse as a board.
pub(crate) fn solve_file(
    path: &Path,
    expected: Option<&PathBuf>,
    common: &CommonOptions,
) -> Result<(), String> {
    if !path.is_file() {
        return Err(format!("Provided path is not a file: {}", path.display()));
    }

    let time = std::time::Instant::now();
    let board = Board::from_path(path)
        .map_err(|e| format!("Error parsing puzzle file {}: {e}", path.display()))?;
    let expected = expected
        .map(|p| {
            Board::from_path(p)
                .map_err(|e| format!("Error parsing expected solution {}: {e}", p.display()))
        })
        .transpose()?;
    let parse_time = time.elapsed();

    solve_and_report(board, expected, Some(path), parse_time, common);
    Ok(())
}

/// Solves a puzzle given as literal text and reports the outcome.
///
/// # Errors
///
/// If the input doesn't parse as a board.
pub(crate) fn solve_text(
    input: &str,
    expected: Option<&str>,
    common: &CommonOptions,
) -> Result<(), String> {
    let time = std::time::Instant::now();
    let board: Board = input
        .parse()
        .map_err(|e| format!("Error parsing puzzle input: {e}"))?;
    let expected = expected
        .map(|s| {
            s.parse::<Board>()
                .map_err(|e| format!("Error parsing expected solution: {e}"))
        })
        .transpose()?;
    let parse_time = time.elapsed();

    solve_and_report(board, expected, None, parse_time, common);
    Ok(())
}

/// Solves every `.sudoku` file under a directory.
///
/// # Errors
///
/// If the path is not a directory or any puzzle file fails to parse.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!(
            "Provided path is not a directory: {}",
            path.display()
        ));
    }

    for entry in walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if file_path.extension().is_none_or(|ext| ext != "sudoku") {
            eprintln!("Skipping non-puzzle file: {}", file_path.display());
            continue;
        }

        solve_file(file_path, None, common)?;
    }

    Ok(())
}

/// Solves a parsed board and prints the solution, verification result, and
/// statistics according to the common options.
pub(crate) fn solve_and_report(
    board: Board,
    expected: Option<Board>,
    label: Option<&Path>,
    parse_time: Duration,
    common: &CommonOptions,
) {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }
    println!("Parsed puzzle ({} givens):\n{board}", board.solved_cells());

    epoch::advance().unwrap();
    let time = std::time::Instant::now();

    let mut engine = match expected.clone() {
        Some(exp) => Engine::with_expected(board.clone(), exp),
        None => Engine::new(board.clone()),
    };
    let outcome = engine.solve();

    let elapsed = time.elapsed();

    epoch::advance().unwrap();
    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();
    let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
    let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

    if common.verify {
        verify_solution(&board, &outcome);
    }

    if common.stats {
        print_stats(
            parse_time,
            elapsed,
            &board,
            engine.stats(),
            allocated_mib,
            resident_mib,
            &outcome,
        );
    }

    match &outcome {
        SolveOutcome::Solved(solution) => {
            println!("Solution:\n{solution}");
            if let Some(exp) = &expected {
                report_diff(solution, exp);
            }
        }
        SolveOutcome::Unsolvable => println!("No solution found"),
        SolveOutcome::Contradictory => println!("Puzzle is contradictory as given"),
    }
}

/// Verifies a found solution against the Sudoku rules and the original
/// givens.
///
/// # Panics
///
/// If the solution fails verification; a solved outcome that breaks the
/// rules means the engine is broken.
pub(crate) fn verify_solution(board: &Board, outcome: &SolveOutcome) {
    if let SolveOutcome::Solved(solution) = outcome {
        let ok = solution.is_valid_solution()
            && (0..9).all(|r| {
                (0..9).all(|c| board.get(r, c).is_none() || board.get(r, c) == solution.get(r, c))
            });
        println!("Verified: {ok:?}");
        assert!(ok, "Solution failed verification!");
    }
}

/// Prints where a found solution disagrees with the expected one.
fn report_diff(solution: &Board, expected: &Board) {
    let mismatches = solution.diff(expected);
    if mismatches.is_empty() {
        println!("Matches the expected solution");
        return;
    }
    println!("Differs from the expected solution:");
    for (r, c, got, want) in mismatches {
        let got = got.map_or('.', |v| (b'0' + v) as char);
        let want = want.map_or('.', |v| (b'0' + v) as char);
        println!("  ({r}, {c}): got {got}, expected {want}");
    }
}

/// Helper function to print a single statistic line in a formatted table
/// row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate
/// (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of puzzle and search statistics.
pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    board: &Board,
    s: &SolveStats,
    allocated: f64,
    resident: f64,
    outcome: &SolveOutcome,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Puzzle Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Givens", board.solved_cells());
    stat_line("Open cells", 81 - board.solved_cells());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Passes", s.passes, elapsed_secs);
    stat_line_with_rate("Guesses", s.guesses, elapsed_secs);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line("Max search depth", s.max_depth);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");

    match outcome {
        SolveOutcome::Solved(_) => println!("\nSOLVED"),
        SolveOutcome::Unsolvable => println!("\nUNSOLVABLE"),
        SolveOutcome::Contradictory => println!("\nCONTRADICTORY"),
    }
}
