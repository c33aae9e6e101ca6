//! Building puzzles out of CNF formulas.
//!
//! Every satisfying assignment of a formula becomes one row of the ground truth, so a
//! formula with `s` solutions over `n` variables turns into an `s × n` puzzle.

use crate::error::{PuzzleError, PuzzleResult};
use crate::nonogram::clue::Clue;
use crate::nonogram::grid::Nonogram;
use crate::nonogram::marking::Marking;
use crate::sat::cnf::Cnf;
use crate::sat::solver::enumerate_all_solutions;
use bit_vec::BitVec;
use log::debug;
use rustc_hash::FxHashSet;

/// The puzzle whose rows are the satisfying assignments of `cnf`, in ascending order.
///
/// # Errors
///
/// - `PuzzleError::Unsatisfiable` if `cnf` has no solution.
/// - `PuzzleError::TooManyVariables` if `cnf` is too large to enumerate.
pub fn decode(cnf: &Cnf) -> PuzzleResult<Nonogram> {
    let solutions = enumerate_all_solutions(cnf)?;
    if solutions.is_empty() {
        return Err(PuzzleError::Unsatisfiable);
    }

    let rows = solutions.len();
    let cols = cnf.num_vars();
    debug!("decoding {rows} solutions over {cols} variables");

    let mut ground_truth = BitVec::with_capacity(rows * cols);
    for solution in &solutions {
        ground_truth.extend(solution.iter());
    }
    Nonogram::from_solution(rows, cols, ground_truth)
}

/// The run-length clue of every satisfying assignment, in ascending order.
///
/// Without `allow_duplicates` only the first occurrence of each clue is kept.
///
/// # Errors
///
/// `PuzzleError::TooManyVariables` if `cnf` is too large to enumerate.
pub fn clue_sets(cnf: &Cnf, allow_duplicates: bool) -> PuzzleResult<Vec<Clue>> {
    let mut seen = FxHashSet::default();
    Ok(enumerate_all_solutions(cnf)?
        .iter()
        .map(|solution| Clue::from_bits(solution.iter()))
        .filter(|clue| allow_duplicates || seen.insert(clue.clone()))
        .collect())
}

/// Every satisfying assignment of `cnf` as a line of `Filled`/`Empty` cells.
///
/// # Errors
///
/// `PuzzleError::TooManyVariables` if `cnf` is too large to enumerate.
pub fn key_sets(cnf: &Cnf) -> PuzzleResult<Vec<Vec<Marking>>> {
    Ok(enumerate_all_solutions(cnf)?
        .iter()
        .map(|solution| solution.iter().map(Marking::from).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonogram::encoding::encode_clue;

    fn cnf(clauses: Vec<Vec<i32>>) -> Cnf {
        Cnf::from_literals(clauses).unwrap()
    }

    fn clue(runs: &[usize]) -> Clue {
        Clue::new(runs.to_vec()).unwrap()
    }

    #[test]
    fn test_decode_rows_are_solutions() {
        // (1 v 2) ^ ~3 over three variables: 010, 100, 110.
        let puzzle = decode(&cnf(vec![vec![1, 2], vec![-3]])).unwrap();
        assert_eq!(puzzle.rows(), 3);
        assert_eq!(puzzle.cols(), 3);
        assert_eq!(puzzle.row_clues(), &[clue(&[1]), clue(&[1]), clue(&[2])]);
        assert_eq!(puzzle.col_clues(), &[clue(&[2]), clue(&[1, 1]), Clue::empty()]);
    }

    #[test]
    fn test_decode_unsatisfiable() {
        assert!(matches!(
            decode(&cnf(vec![vec![1], vec![-1]])),
            Err(PuzzleError::Unsatisfiable)
        ));
    }

    #[test]
    fn test_encoded_alternatives_decode_to_their_clue() {
        let formulas = encode_clue(&clue(&[2, 1]), 5).unwrap();
        assert_eq!(formulas.len(), 3);
        for formula in &formulas {
            let puzzle = decode(formula).unwrap();
            assert_eq!(puzzle.rows(), 1);
            assert_eq!(puzzle.cols(), 5);
            assert_eq!(puzzle.row_clues(), &[clue(&[2, 1])]);
        }
    }

    #[test]
    fn test_clue_sets() {
        let formula = cnf(vec![vec![1, 2], vec![-3]]);
        assert_eq!(
            clue_sets(&formula, true).unwrap(),
            vec![clue(&[1]), clue(&[1]), clue(&[2])]
        );
        assert_eq!(
            clue_sets(&formula, false).unwrap(),
            vec![clue(&[1]), clue(&[2])]
        );
    }

    #[test]
    fn test_key_sets() {
        let keys = key_sets(&cnf(vec![vec![1], vec![-2]])).unwrap();
        assert_eq!(keys, vec![vec![Marking::Filled, Marking::Empty]]);
    }
}
