#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Boolean formulas in CNF, their file formats, and exhaustive solving.

pub mod clause;
pub mod clause_list;
pub mod cnf;
pub mod dimacs;
pub mod solver;

pub use clause::Clause;
pub use cnf::Cnf;
pub use solver::{
    BruteForceSolver, SearchStats, Solver, brute_force_solve, enumerate_all_solutions,
};
