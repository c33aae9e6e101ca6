//! Nonogram puzzles: the model, the solvers and the translation to and from CNF.

pub mod clue;
pub mod decoding;
pub mod encoding;
pub mod grid;
pub mod line;
pub mod marking;
pub mod parser;
pub mod solver;

pub use clue::Clue;
pub use decoding::{clue_sets, decode, key_sets};
pub use encoding::{encode_clue, exact_fit_formula, line_to_cnf};
pub use grid::Nonogram;
pub use marking::Marking;
pub use solver::{
    CompletionTarget, SolveReport, SolverConfig, StopCriterion, brute_force_remaining,
    heuristic_solve,
};
