#![warn(missing_docs)]
//! This crate solves nonogram puzzles and translates their line constraints to and from
//! boolean formulas in conjunctive normal form.

/// Errors shared by every module of the crate.
pub mod error;

/// The `nonogram` module holds the puzzle model, the line and grid solvers, the puzzle file
/// format, and the conversions between clues and CNF.
pub mod nonogram;

/// The `sat` module holds CNF formulas, their file formats and exhaustive satisfiability
/// checking.
pub mod sat;

pub use error::{PuzzleError, PuzzleResult};
