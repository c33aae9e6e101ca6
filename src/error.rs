//! Error types shared by the nonogram and SAT modules.

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type PuzzleResult<T> = Result<T, PuzzleError>;

/// Every failure the library reports to its callers.
///
/// Running out of deduction budget in the heuristic solver is not an error and has no
/// variant here; it is reported through `SolveReport` instead.
#[derive(Error, Debug)]
pub enum PuzzleError {
    /// The runs of a clue, plus the mandatory single gaps between them, are longer than the line.
    #[error("clue [{clue}] needs {required} cells but the line only has {length}")]
    ClueDoesNotFit {
        /// The offending clue, rendered as space separated run lengths.
        clue: String,
        /// Minimum number of cells the clue occupies.
        required: usize,
        /// Length of the line it was placed in.
        length: usize,
    },
    /// A clue contained a run of length zero.
    #[error("clue runs must be positive, found {0:?}")]
    InvalidClue(Vec<usize>),
    /// A clause contained the literal `0`, which names no variable.
    #[error("literal 0 does not name a variable")]
    InvalidLiteral,
    /// A raw integer could not be turned into a marking.
    #[error("{0} is not a valid marking")]
    InvalidMarking(i8),
    /// Two sizes that must agree did not.
    #[error("expected {expected} {what}, found {found}")]
    DimensionMismatch {
        /// What was being counted (rows, columns, cells...).
        what: &'static str,
        /// The size that was required.
        expected: usize,
        /// The size that was supplied.
        found: usize,
    },
    /// A puzzle index does not address a puzzle of the requested size.
    #[error("index {index} is out of range for a {rows}x{cols} puzzle")]
    IndexOutOfRange {
        /// Requested index.
        index: u64,
        /// Row count of the puzzle.
        rows: usize,
        /// Column count of the puzzle.
        cols: usize,
    },
    /// A line of an input file could not be understood.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number in the input.
        line: usize,
        /// What went wrong.
        message: String,
    },
    /// No assignment satisfies the formula.
    #[error("formula is unsatisfiable")]
    Unsatisfiable,
    /// Brute-force completion tried every candidate without finding a match.
    #[error("brute force tried all {tried} candidates without a match")]
    SearchExhausted {
        /// Number of candidates tried.
        tried: usize,
    },
    /// Too many unknown cells remain for brute-force completion.
    #[error("{unknowns} unknown cells exceed the brute force limit of {limit}")]
    SearchSpaceTooLarge {
        /// Number of unknown cells in the grid.
        unknowns: usize,
        /// The configured limit.
        limit: usize,
    },
    /// The formula has too many variables for exhaustive enumeration.
    #[error("{variables} variables exceed the enumeration limit of {limit}")]
    TooManyVariables {
        /// Number of variables referenced by the formula.
        variables: usize,
        /// The enumeration limit.
        limit: usize,
    },
    /// An operation needed the ground-truth grid but the puzzle has none.
    #[error("the puzzle has no known solution")]
    NoKnownSolution,
    /// IO error while reading or writing a puzzle or formula.
    #[error("IO error, more details: {0}")]
    Io(#[from] std::io::Error),
}
