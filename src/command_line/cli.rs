#![allow(clippy::cast_precision_loss)]

use clap::{Args, Parser, Subcommand, ValueEnum};
use itertools::Itertools;
use log::{info, warn};
use nonogram_sat::error::{PuzzleError, PuzzleResult};
use nonogram_sat::nonogram::parser::{parse_nonogram_file, write_nonogram_file};
use nonogram_sat::nonogram::{
    CompletionTarget, Nonogram, SolveReport, SolverConfig, StopCriterion, brute_force_remaining,
    heuristic_solve,
};
use nonogram_sat::sat::clause_list::{parse_clause_list_file, write_clause_list_file};
use nonogram_sat::sat::cnf::Cnf;
use nonogram_sat::sat::dimacs;
use nonogram_sat::sat::{BruteForceSolver, SearchStats, Solver};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the nonogram solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "nonogram-sat",
    version,
    about = "Solve nonograms and convert them to and from CNF"
)]
pub(crate) struct Cli {
    /// Specifies the subcommand to execute.
    #[clap(subcommand)]
    pub command: Commands,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a puzzle file in `.dat` layout.
    Solve {
        /// Path to the puzzle file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate a random puzzle and solve it.
    Random {
        /// Number of rows.
        #[arg(long)]
        rows: usize,

        /// Number of columns.
        #[arg(long)]
        cols: usize,

        /// Seed for reproducible puzzles.
        #[arg(long)]
        seed: Option<u64>,

        /// Write the generated puzzle to this file. Existing files are never overwritten.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Build the puzzle whose row-major cells are the bits of an index, most significant first.
    FromIndex {
        /// Number of rows.
        #[arg(long)]
        rows: usize,

        /// Number of columns.
        #[arg(long)]
        cols: usize,

        /// The puzzle index.
        #[arg(long)]
        index: u64,

        /// Write the puzzle to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Write every puzzle of the given size to a directory.
    WriteAll {
        /// Number of rows.
        #[arg(long)]
        rows: usize,

        /// Number of columns.
        #[arg(long)]
        cols: usize,

        /// Target directory, created if missing.
        #[arg(long)]
        dir: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every puzzle of the given size and report success rates.
    SolveAll {
        /// Number of rows.
        #[arg(long)]
        rows: usize,

        /// Number of columns.
        #[arg(long)]
        cols: usize,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every `.dat` file below a directory.
    Dir {
        /// Directory to walk.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Print the CNF alternatives of every row clue of a puzzle.
    Encode {
        /// Path to the puzzle file.
        #[arg(long)]
        path: PathBuf,

        /// Also write each alternative as a clause list into this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Turn a formula into the puzzle whose rows are its solutions.
    Decode {
        /// Path to a clause list (`.sat`) or DIMACS (`.cnf`) file.
        #[arg(long)]
        path: PathBuf,

        /// Write the puzzle to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Print a formula, whether it is satisfiable, and all of its solutions.
    Sat {
        /// Path to a clause list (`.sat`) or DIMACS (`.cnf`) file.
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

impl Commands {
    /// The common options of the subcommand, if it takes any.
    pub(crate) const fn common(&self) -> Option<&CommonOptions> {
        match self {
            Self::Solve { common, .. }
            | Self::Random { common, .. }
            | Self::FromIndex { common, .. }
            | Self::WriteAll { common, .. }
            | Self::SolveAll { common, .. }
            | Self::Dir { common, .. }
            | Self::Encode { common, .. }
            | Self::Decode { common, .. }
            | Self::Sat { common, .. } => Some(common),
            Self::Completions { .. } => None,
        }
    }
}

/// When the heuristic passes stop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum StopOn {
    /// Every cell is filled or eliminated.
    #[default]
    Confirmed,
    /// The grid equals the known solution.
    Solution,
}

impl From<StopOn> for StopCriterion {
    fn from(value: StopOn) -> Self {
        match value {
            StopOn::Confirmed => Self::FullyConfirmed,
            StopOn::Solution => Self::MatchesSolution,
        }
    }
}

/// What a brute-force completion must agree with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Target {
    /// The known solution.
    Solution,
    /// The row and column clues.
    #[default]
    Clues,
}

impl From<Target> for CompletionTarget {
    fn from(value: Target) -> Self {
        match value {
            Target::Solution => Self::KnownSolution,
            Target::Clues => Self::Clues,
        }
    }
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Clone)]
pub(crate) struct CommonOptions {
    /// Enable debug output, providing more verbose logging during solving.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Scales the deduction budget of the heuristic solver, `coefficient * (rows + cols)`.
    #[arg(long, default_value_t = 1.0)]
    pub(crate) sanity_coefficient: f64,

    /// When the heuristic passes stop.
    #[arg(long, value_enum, default_value_t = StopOn::Confirmed)]
    pub(crate) stop_on: StopOn,

    /// Most unknown cells brute force will enumerate (at most 63).
    #[arg(long, default_value_t = 24)]
    pub(crate) max_brute_force_cells: usize,

    /// Enable printing of performance and problem statistics after solving.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,

    /// Fall back to brute force when the heuristic solver does not finish.
    #[arg(short, long, default_value_t = false)]
    pub(crate) brute_force: bool,

    /// What a brute-force completion must agree with.
    #[arg(long, value_enum, default_value_t = Target::Clues)]
    pub(crate) target: Target,
}

impl CommonOptions {
    /// The solver configuration these options describe.
    pub(crate) fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            sanity_coefficient: self.sanity_coefficient,
            stop_criterion: self.stop_on.into(),
            max_brute_force_cells: self.max_brute_force_cells,
        }
    }
}

/// Parses a puzzle file, solves it and reports the result. Returns whether it was solved.
///
/// # Errors
///
/// If the file cannot be read or parsed, or brute force fails.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> PuzzleResult<bool> {
    let time = Instant::now();
    let mut puzzle = parse_nonogram_file(path)?;
    let parse_time = time.elapsed();

    println!("Parsed Nonogram:\n{puzzle}");
    solve_and_report(&mut puzzle, common, Some(path), parse_time)
}

/// Runs the heuristic solver, optionally brute force, then prints the grid and statistics.
/// Returns whether the puzzle was solved.
///
/// # Errors
///
/// Propagates solver errors.
pub(crate) fn solve_and_report(
    puzzle: &mut Nonogram,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> PuzzleResult<bool> {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }

    let config = common.solver_config();
    let time = Instant::now();
    let report = heuristic_solve(puzzle, &config)?;

    let brute_force_attempts = if !report.solved && common.brute_force {
        Some(brute_force_remaining(puzzle, common.target.into(), &config)?)
    } else {
        None
    };
    let elapsed = time.elapsed();

    println!("\n{puzzle}");
    if common.stats {
        let (allocated, resident) = memory_mib();
        print_stats(
            parse_time,
            elapsed,
            puzzle,
            &report,
            brute_force_attempts,
            allocated,
            resident,
        );
    }

    let solved = report.solved || brute_force_attempts.is_some();
    println!("\n{}", if solved { "SOLVED" } else { "UNSOLVED" });
    Ok(solved)
}

/// Generates a random puzzle, optionally writes it, and solves it.
///
/// # Errors
///
/// If writing or solving fails.
pub(crate) fn solve_random(
    rows: usize,
    cols: usize,
    seed: Option<u64>,
    output: Option<&Path>,
    common: &CommonOptions,
) -> PuzzleResult<()> {
    let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let mut puzzle = Nonogram::random_with(&mut rng, rows, cols);

    println!("Generated Nonogram:\n{puzzle}");
    println!("Key:\n{}", ground_truth(&puzzle));
    if let Some(path) = output {
        write_nonogram_file(path, &puzzle)?;
        println!("Nonogram written to: {}", path.display());
    }

    solve_and_report(&mut puzzle, common, None, Duration::ZERO)?;
    Ok(())
}

/// Prints the puzzle with the given index and optionally writes it.
///
/// # Errors
///
/// If the index is out of range or writing fails.
pub(crate) fn show_index(
    rows: usize,
    cols: usize,
    index: u64,
    output: Option<&Path>,
) -> PuzzleResult<()> {
    let puzzle = Nonogram::from_index(rows, cols, index)?;
    println!("Nonogram {index}:\n{puzzle}");
    println!("Key:\n{}", ground_truth(&puzzle));

    if let Some(path) = output {
        write_nonogram_file(path, &puzzle)?;
        println!("Nonogram written to: {}", path.display());
    }
    Ok(())
}

/// Writes every rows × cols puzzle into `dir`, returning how many were written.
///
/// # Errors
///
/// If the size is too large to enumerate or a file cannot be written.
pub(crate) fn write_every_puzzle(rows: usize, cols: usize, dir: &Path) -> PuzzleResult<usize> {
    std::fs::create_dir_all(dir)?;

    let mut tally = 0;
    for (index, puzzle) in Nonogram::every_puzzle(rows, cols)?.enumerate() {
        let path = dir.join(format!("nonogram_{rows}x{cols}_{index}.dat"));
        write_nonogram_file(&path, &puzzle)?;
        tally += 1;
    }

    println!("Wrote {tally} puzzles to {}", dir.display());
    Ok(tally)
}

/// Success counts over every puzzle of one size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) total: usize,
    pub(crate) heuristic: usize,
    pub(crate) brute_force_runs: usize,
    pub(crate) brute_force_successes: usize,
    pub(crate) brute_force_attempts: usize,
}

/// Solves every rows × cols puzzle in memory, falling back to brute force when needed.
///
/// # Errors
///
/// If the size is too large to enumerate or the heuristic solver fails.
pub(crate) fn solve_every_puzzle(
    rows: usize,
    cols: usize,
    common: &CommonOptions,
) -> PuzzleResult<Tally> {
    let config = common.solver_config();
    let mut tally = Tally::default();

    for (index, mut puzzle) in Nonogram::every_puzzle(rows, cols)?.enumerate() {
        tally.total += 1;
        if heuristic_solve(&mut puzzle, &config)?.solved {
            tally.heuristic += 1;
            continue;
        }

        tally.brute_force_runs += 1;
        match brute_force_remaining(&mut puzzle, common.target.into(), &config) {
            Ok(attempts) => {
                tally.brute_force_successes += 1;
                tally.brute_force_attempts += attempts;
            }
            Err(e) => warn!("failed to solve nonogram {index}: {e}"),
        }
    }

    println!(
        "All methods: {}/{} succeeded.",
        tally.heuristic + tally.brute_force_successes,
        tally.total
    );
    println!(
        "Heuristic solve succeeded {}/{} times.",
        tally.heuristic, tally.total
    );
    if tally.brute_force_runs > 0 {
        println!(
            "Heuristic-brute-force succeeded {}/{} times.",
            tally.brute_force_successes, tally.brute_force_runs
        );
        println!(
            "Average brute-force attempts per non-heuristic puzzle: {:.3}",
            tally.brute_force_attempts as f64 / tally.brute_force_runs as f64
        );
    }
    Ok(tally)
}

/// Solves every `.dat` file below `path`.
///
/// # Errors
///
/// If `path` is not a directory, or a puzzle cannot be read or solved.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> PuzzleResult<()> {
    if !path.is_dir() {
        return Err(PuzzleError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("provided path is not a directory: {}", path.display()),
        )));
    }

    for entry in walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if file_path.extension().is_none_or(|ext| ext != "dat") {
            info!("skipping non-puzzle file: {}", file_path.display());
            continue;
        }

        solve_file(file_path, common)?;
    }

    Ok(())
}

/// Prints the CNF alternatives of each row clue and optionally writes them as clause lists.
///
/// # Errors
///
/// If the puzzle cannot be read, encoded or written.
pub(crate) fn encode_file(path: &Path, output_dir: Option<&Path>) -> PuzzleResult<()> {
    let puzzle = parse_nonogram_file(path)?;
    let source_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    for (row, formulas) in puzzle.row_formulas()?.iter().enumerate() {
        println!("Row {row} [{}]:", puzzle.row_clues()[row]);
        for (k, formula) in formulas.iter().enumerate() {
            println!("  SAT {k}: {}", formula.to_letters());
            if let Some(dir) = output_dir {
                let target = dir.join(format!("sat_{row}_{k}_from_{source_name}"));
                write_clause_list_file(&target, formula)?;
                println!("  Wrote SAT to {}", target.display());
            }
        }
    }
    Ok(())
}

/// Reads a formula, picking DIMACS for `.cnf` files and the clause-list layout otherwise.
///
/// # Errors
///
/// If the file cannot be read or parsed.
pub(crate) fn read_formula(path: &Path) -> PuzzleResult<Cnf> {
    if path.extension().is_some_and(|ext| ext == "cnf") {
        dimacs::parse_file(path)
    } else {
        parse_clause_list_file(path)
    }
}

/// Decodes the formula at `path` into a puzzle and optionally writes it.
///
/// # Errors
///
/// If the formula cannot be read or is unsatisfiable, or writing fails.
pub(crate) fn decode_file(path: &Path, output: Option<&Path>) -> PuzzleResult<Nonogram> {
    let cnf = read_formula(path)?;
    println!("SAT: {}", cnf.to_letters());

    let puzzle = nonogram_sat::nonogram::decode(&cnf)?;
    println!("Nonogram:\n{puzzle}");
    println!("Key:\n{}", ground_truth(&puzzle));

    if let Some(target) = output {
        write_nonogram_file(target, &puzzle)?;
        println!("Nonogram written to: {}", target.display());
    }
    Ok(puzzle)
}

/// Prints a formula, whether it is satisfiable, and all its solutions.
///
/// # Errors
///
/// If the formula cannot be read or is too large to enumerate.
pub(crate) fn check_sat(path: &Path, common: &CommonOptions) -> PuzzleResult<()> {
    let time = Instant::now();
    let cnf = read_formula(path)?;
    let parse_time = time.elapsed();

    println!("SAT: {cnf}");
    println!("SAT as letters: {}", cnf.to_letters());

    let mut solver = BruteForceSolver::new(cnf);
    let time = Instant::now();
    let solutions = solver.solve_all()?;
    let elapsed = time.elapsed();

    if solutions.is_empty() {
        println!("Not satisfiable");
    } else {
        println!("Satisfiable");
        println!("All {} solutions:", solutions.len());
        for solution in &solutions {
            let bits = solution.iter().map(|b| u8::from(b).to_string()).join("");
            println!("{bits}");
        }
    }

    if common.stats {
        let (allocated, resident) = memory_mib();
        print_search_stats(parse_time, elapsed, solver.cnf(), solver.stats(), allocated, resident);
    }
    Ok(())
}

/// The ground truth of `puzzle` as rows of `#` and `.`, or a note that there is none.
pub(crate) fn ground_truth(puzzle: &Nonogram) -> String {
    let Some(solution) = puzzle.solution() else {
        return "(unknown)".to_string();
    };
    (0..puzzle.rows())
        .map(|r| {
            (0..puzzle.cols())
                .map(|c| if solution[r * puzzle.cols() + c] { '#' } else { '.' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Allocated and resident memory in MiB, or zeros if jemalloc cannot report them.
pub(crate) fn memory_mib() -> (f64, f64) {
    let read = || -> Result<(usize, usize), tikv_jemalloc_ctl::Error> {
        epoch::advance()?;
        Ok((stats::allocated::read()?, stats::resident::read()?))
    };
    read().map_or((0.0, 0.0), |(allocated, resident)| {
        (
            allocated as f64 / (1024.0 * 1024.0),
            resident as f64 / (1024.0 * 1024.0),
        )
    })
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of puzzle and search statistics.
#[allow(clippy::too_many_arguments)]
pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    puzzle: &Nonogram,
    report: &SolveReport,
    brute_force_attempts: Option<usize>,
    allocated: f64,
    resident: f64,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Puzzle Statistics ]==========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Rows", puzzle.rows());
    stat_line("Columns", puzzle.cols());
    stat_line("Clue cells", puzzle.clue_cell_count());

    println!("========================[ Search Statistics ]========================");
    stat_line("Passes", report.passes);
    stat_line("Budget", report.budget);
    stat_line("Budget remaining", report.budget_remaining);
    stat_line("Stalled", report.stalled);
    stat_line("Unknown cells left", puzzle.unknown_cells().len());
    if let Some(attempts) = brute_force_attempts {
        stat_line_with_rate("Brute force tries", attempts, elapsed_secs);
    }
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}

/// Prints a summary of formula and enumeration statistics.
pub(crate) fn print_search_stats(
    parse_time: Duration,
    elapsed: Duration,
    cnf: &Cnf,
    s: SearchStats,
    allocated: f64,
    resident: f64,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", cnf.num_vars());
    stat_line("Clauses", cnf.len());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Candidates", s.candidates, elapsed_secs);
    stat_line("Solutions", s.solutions);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}
