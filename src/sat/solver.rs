//! Exhaustive satisfiability checking for small formulas.
//!
//! Candidates are the integers `0..2^n` for a formula with `n` variables. Variable `i` takes
//! bit `n - i` of the candidate, so variable 1 is the most significant bit and solutions
//! come out in ascending binary order.

use crate::error::{PuzzleError, PuzzleResult};
use crate::sat::cnf::Cnf;
use bit_vec::BitVec;
use log::debug;

/// Most variables, or unknown cells, a `u64` counter can enumerate.
pub const MAX_ENUMERATION_BITS: usize = 63;

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidate assignments evaluated.
    pub candidates: usize,
    /// Satisfying assignments found.
    pub solutions: usize,
}

/// A SAT solver over a single formula.
pub trait Solver {
    /// Prepares a solver for `cnf`.
    fn new(cnf: Cnf) -> Self;

    /// The first satisfying assignment, or `None` if the formula is unsatisfiable.
    ///
    /// # Errors
    ///
    /// Implementation-specific limits on the formula size.
    fn solve(&mut self) -> PuzzleResult<Option<BitVec>>;

    /// Statistics accumulated so far.
    fn stats(&self) -> SearchStats;
}

/// Tries every assignment in ascending order.
#[derive(Debug, Clone)]
pub struct BruteForceSolver {
    cnf: Cnf,
    stats: SearchStats,
}

impl BruteForceSolver {
    /// The formula being solved.
    #[must_use]
    pub const fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// Every satisfying assignment, in ascending order.
    ///
    /// # Errors
    ///
    /// `PuzzleError::TooManyVariables` if the formula has more than
    /// [`MAX_ENUMERATION_BITS`] variables.
    pub fn solve_all(&mut self) -> PuzzleResult<Vec<BitVec>> {
        let mut solutions = Vec::new();
        self.search(|assignment| {
            solutions.push(assignment);
            true
        })?;
        Ok(solutions)
    }

    /// Feeds satisfying assignments to `on_solution` until it returns `false`.
    fn search<F: FnMut(BitVec) -> bool>(&mut self, mut on_solution: F) -> PuzzleResult<()> {
        let n = self.cnf.num_vars();
        if n > MAX_ENUMERATION_BITS {
            return Err(PuzzleError::TooManyVariables {
                variables: n,
                limit: MAX_ENUMERATION_BITS,
            });
        }

        debug!("enumerating {} candidates over {n} variables", 1_u64 << n);
        for candidate in 0..1_u64 << n {
            self.stats.candidates += 1;
            let assignment = candidate_assignment(n, candidate);
            if self.cnf.evaluate(&assignment) {
                self.stats.solutions += 1;
                if !on_solution(assignment) {
                    break;
                }
            }
        }
        Ok(())
    }
}

impl Solver for BruteForceSolver {
    fn new(cnf: Cnf) -> Self {
        Self {
            cnf,
            stats: SearchStats::default(),
        }
    }

    fn solve(&mut self) -> PuzzleResult<Option<BitVec>> {
        let mut found = None;
        self.search(|assignment| {
            found = Some(assignment);
            false
        })?;
        Ok(found)
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}

/// The assignment encoded by `candidate` for `n` variables.
fn candidate_assignment(n: usize, candidate: u64) -> BitVec {
    BitVec::from_fn(n, |k| (candidate >> (n - 1 - k)) & 1 == 1)
}

/// The first satisfying assignment of `cnf` in ascending order, if any.
///
/// # Errors
///
/// `PuzzleError::TooManyVariables` if the formula has more than [`MAX_ENUMERATION_BITS`]
/// variables.
pub fn brute_force_solve(cnf: &Cnf) -> PuzzleResult<Option<BitVec>> {
    BruteForceSolver::new(cnf.clone()).solve()
}

/// Every satisfying assignment of `cnf`, in ascending order.
///
/// # Errors
///
/// `PuzzleError::TooManyVariables` if the formula has more than [`MAX_ENUMERATION_BITS`]
/// variables.
pub fn enumerate_all_solutions(cnf: &Cnf) -> PuzzleResult<Vec<BitVec>> {
    BruteForceSolver::new(cnf.clone()).solve_all()
}
