//! The plain clause-list layout used for `.sat` files.
//!
//! ```text
//! 3
//! 1 -2
//! 3
//! $
//! ```
//!
//! The first line holds the number of distinct variables, every following line one clause,
//! and a lone `$` closes the list without a trailing newline.

use crate::error::{PuzzleError, PuzzleResult};
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use itertools::Itertools;
use std::io::{self, BufRead, Write};
use std::path::Path;

const END_MARKER: &str = "$";

/// Writes `cnf` in clause-list layout.
///
/// # Errors
///
/// `PuzzleError::Io` if writing fails.
pub fn write_clause_list<W: Write>(mut writer: W, cnf: &Cnf) -> PuzzleResult<()> {
    writeln!(writer, "{}", cnf.variables().len())?;
    for clause in cnf.clauses() {
        writeln!(writer, "{}", clause.iter().join(" "))?;
    }
    write!(writer, "{END_MARKER}")?;
    Ok(())
}

/// Writes `cnf` to a new file at `path`, replacing any existing file.
///
/// # Errors
///
/// `PuzzleError::Io` if the file cannot be written.
pub fn write_clause_list_file<P: AsRef<Path>>(path: P, cnf: &Cnf) -> PuzzleResult<()> {
    let mut writer = io::BufWriter::new(std::fs::File::create(path)?);
    write_clause_list(&mut writer, cnf)?;
    writer.flush()?;
    Ok(())
}

/// Reads a clause list. The header's value is not checked, reading stops at `$`, and a blank
/// line is an empty clause.
///
/// # Errors
///
/// - `PuzzleError::Io` if reading fails.
/// - `PuzzleError::Parse` if a token is not an integer.
/// - `PuzzleError::InvalidLiteral` if a clause contains `0`.
pub fn parse_clause_list<R: BufRead>(reader: R) -> PuzzleResult<Cnf> {
    let mut cnf = Cnf::default();

    for (number, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let trimmed = line.trim();
        if trimmed == END_MARKER {
            break;
        }
        let literals = trimmed
            .split_whitespace()
            .map(|token| {
                token.parse::<i32>().map_err(|e| PuzzleError::Parse {
                    line: number + 1,
                    message: format!("failed to parse literal '{token}': {e}"),
                })
            })
            .collect::<PuzzleResult<Vec<i32>>>()?;
        cnf.add_clause(Clause::new(literals)?);
    }

    Ok(cnf)
}

/// Reads the clause list at `path`.
///
/// # Errors
///
/// See [`parse_clause_list`]; also fails if the file cannot be opened.
pub fn parse_clause_list_file<P: AsRef<Path>>(path: P) -> PuzzleResult<Cnf> {
    let file = std::fs::File::open(path)?;
    parse_clause_list(io::BufReader::new(file))
}
