//! Translating a line clue into CNF.
//!
//! Cell `k` of a line (0-based) is variable `k + 1`. A clue becomes a list of alternative
//! formulas: any one of them being satisfied describes a valid line.

use crate::error::{PuzzleError, PuzzleResult};
use crate::nonogram::clue::Clue;
use crate::nonogram::line::{completions, is_confirmed, solve_line};
use crate::nonogram::marking::Marking;
use crate::sat::clause::{Clause, Literal};
use crate::sat::cnf::Cnf;
use log::trace;

/// CNF alternatives for `clue` on a line of `length` cells.
///
/// - The empty clue gives a single clause negating every cell, which forbids only the
///   all-filled line.
/// - A clue that fits exactly gives one formula from [`exact_fit_formula`].
/// - Any other clue gives one formula of unit clauses per completion, in descending
///   binary order of the completions.
///
/// # Errors
///
/// `PuzzleError::ClueDoesNotFit` if the clue is longer than the line.
pub fn encode_clue(clue: &Clue, length: usize) -> PuzzleResult<Vec<Cnf>> {
    clue.check_fits(length)?;

    if clue.is_empty() {
        let negated = (0..length)
            .map(|cell| variable(cell).map(|v| -v))
            .collect::<PuzzleResult<Vec<_>>>()?;
        return Ok(vec![Cnf::new(vec![Clause::new(negated)?])]);
    }

    if clue.is_exact_fit(length) {
        return Ok(vec![exact_fit_formula(clue)?]);
    }

    let mut line = vec![Marking::Unknown; length];
    solve_line(&mut line, clue)?;
    if is_confirmed(&line) {
        return Ok(vec![exact_fit_formula(clue)?]);
    }

    let blank = vec![Marking::Unknown; length];
    let formulas = completions(&blank, clue)?
        .iter()
        .map(|completion| line_to_cnf(completion))
        .collect::<PuzzleResult<Vec<_>>>()?;
    trace!("[{clue}] on {length} cells has {} completions", formulas.len());
    Ok(formulas)
}

/// The formula for a clue laid out in exactly `clue.min_length()` cells.
///
/// Each run contributes one clause that is the disjunction of its cells, and every gap
/// between runs a unit clause negating the gap cell.
///
/// # Errors
///
/// `PuzzleError::TooManyVariables` if a cell index does not fit in a literal.
pub fn exact_fit_formula(clue: &Clue) -> PuzzleResult<Cnf> {
    let mut cnf = Cnf::default();
    let mut tally = 0;

    for (index, &run) in clue.iter().enumerate() {
        let cells = (tally..tally + run)
            .map(variable)
            .collect::<PuzzleResult<Vec<_>>>()?;
        cnf.add_clause(Clause::new(cells)?);
        tally += run;

        if index + 1 < clue.len() {
            cnf.add_clause(Clause::unit(-variable(tally)?)?);
            tally += 1;
        }
    }

    Ok(cnf)
}

/// One unit clause per known cell: positive for `Filled`, negative for `Empty` or
/// `Eliminated`. Unknown and speculative cells are skipped.
///
/// # Errors
///
/// `PuzzleError::TooManyVariables` if a cell index does not fit in a literal.
pub fn line_to_cnf(line: &[Marking]) -> PuzzleResult<Cnf> {
    let mut cnf = Cnf::default();
    for (cell, marking) in line.iter().enumerate() {
        let literal = match marking {
            Marking::Filled => variable(cell)?,
            Marking::Empty | Marking::Eliminated => -variable(cell)?,
            Marking::Unknown | Marking::Speculative => continue,
        };
        cnf.add_clause(Clause::unit(literal)?);
    }
    Ok(cnf)
}

/// The positive literal of 0-based cell `cell`.
fn variable(cell: usize) -> PuzzleResult<Literal> {
    Literal::try_from(cell + 1).map_err(|_| PuzzleError::TooManyVariables {
        variables: cell + 1,
        limit: Literal::MAX.unsigned_abs() as usize,
    })
}
