//! # nonogram-sat
//!
//! `nonogram-sat` solves nonogram puzzles and converts their line clues to and from boolean
//! formulas in conjunctive normal form.
//!
//! Solving runs in two stages:
//! 1.  **Line propagation**: every row and column is deduced from its clue and the cells
//!     already known, pass after pass, until the grid is confirmed, stalls, or the deduction
//!     budget (`sanity_coefficient * (rows + cols)`) runs out.
//! 2.  **Brute force** (optional): the remaining unknown cells are enumerated until the grid
//!     agrees with the clues or with the known solution.
//!
//! ## Usage
//!
//! ```sh
//! nonogram-sat [SUBCOMMAND] [OPTIONS]
//! ```
//!
//! ### Subcommands
//!
//! 1.  **`solve`**: Solve a puzzle file.
//!     ```sh
//!     nonogram-sat solve --path puzzle.dat --brute-force --stats
//!     ```
//!
//! 2.  **`random`**: Generate and solve a random puzzle, optionally saving it.
//!     ```sh
//!     nonogram-sat random --rows 5 --cols 5 --seed 7 -o puzzle.dat
//!     ```
//!
//! 3.  **`from-index`**: Print the puzzle whose cells are the bits of an index.
//!
//! 4.  **`write-all`** / **`solve-all`**: Write or solve every puzzle of a small size.
//!     ```sh
//!     nonogram-sat solve-all --rows 3 --cols 3 --brute-force
//!     ```
//!
//! 5.  **`dir`**: Solve every `.dat` file below a directory.
//!
//! 6.  **`encode`**: Print the CNF alternatives of every row clue, optionally writing each
//!     one as a clause list.
//!
//! 7.  **`decode`**: Turn a formula into the puzzle whose rows are its solutions.
//!
//! 8.  **`sat`**: Print a formula, whether it is satisfiable, and all its solutions.
//!
//! 9.  **`completions`**: Print a shell completion script.
//!
//! ### Common Options
//!
//! -   `-d, --debug`: Enable debug logging (default: `false`). `RUST_LOG` overrides it.
//! -   `--sanity-coefficient <F>`: Scale of the deduction budget (default: `1.0`).
//! -   `--stop-on <confirmed|solution>`: When the heuristic passes stop (default: `confirmed`).
//! -   `-b, --brute-force`: Fall back to brute force (default: `false`).
//! -   `--target <clues|solution>`: What brute force must agree with (default: `clues`).
//! -   `--max-brute-force-cells <N>`: Most unknown cells brute force enumerates (default: `24`).
//! -   `-s, --stats`: Print puzzle, search and memory statistics (default: `false`).

use crate::command_line::cli::{
    Cli, Commands, check_sat, decode_file, encode_file, show_index, solve_dir, solve_every_puzzle,
    solve_file, solve_random, write_every_puzzle,
};
use clap::{CommandFactory, Parser};
use log::LevelFilter;
use nonogram_sat::PuzzleResult;

mod command_line;

/// Global allocator using `tikv-jemallocator`, which also backs the memory statistics.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Main entry point of the application.
///
/// Parses command-line arguments, sets up logging, and dispatches to the subcommand
/// handler. Errors are printed to stderr and exit with status 1.
fn main() {
    let cli = Cli::parse();

    let debug = cli.command.common().is_some_and(|common| common.debug);
    init_logger(debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Logs at `Warn` by default and at `Debug` with `--debug`; `RUST_LOG` takes precedence.
fn init_logger(debug: bool) {
    env_logger::Builder::new()
        .filter_level(if debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> PuzzleResult<()> {
    match cli.command {
        Commands::Solve { path, common } => {
            solve_file(&path, &common)?;
        }
        Commands::Random {
            rows,
            cols,
            seed,
            output,
            common,
        } => solve_random(rows, cols, seed, output.as_deref(), &common)?,
        Commands::FromIndex {
            rows,
            cols,
            index,
            output,
            ..
        } => show_index(rows, cols, index, output.as_deref())?,
        Commands::WriteAll { rows, cols, dir, .. } => {
            write_every_puzzle(rows, cols, &dir)?;
        }
        Commands::SolveAll { rows, cols, common } => {
            solve_every_puzzle(rows, cols, &common)?;
        }
        Commands::Dir { path, common } => solve_dir(&path, &common)?,
        Commands::Encode {
            path, output_dir, ..
        } => encode_file(&path, output_dir.as_deref())?,
        Commands::Decode { path, output, .. } => {
            decode_file(&path, output.as_deref())?;
        }
        Commands::Sat { path, common } => check_sat(&path, &common)?,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }
    Ok(())
}
