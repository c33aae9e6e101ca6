#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! A reader for the DIMACS CNF file format.
//!
//! The format typically includes:
//! - Comment lines starting with 'c'.
//! - A problem line starting with 'p cnf <`num_variables`> <`num_clauses`>'.
//!   The counts are ignored; they are derived from the clauses actually found.
//! - Clause lines of whitespace-separated literals, each clause terminated by a '0'.
//! - An optional '%' line marking the end of the data.
//!
//! Writing goes through [`Cnf::to_dimacs`].

use crate::error::{PuzzleError, PuzzleResult};
use crate::sat::cnf::Cnf;
use crate::sat::clause::Clause;
use std::io::{self, BufRead};
use std::path::Path;

/// Parses DIMACS data from a `BufRead` source.
///
/// Comment and problem lines are skipped, `%` ends the data and the terminating `0` of each
/// clause line is dropped. A line holding only `0` contributes no clause.
///
/// # Errors
///
/// - `PuzzleError::Io` if reading fails.
/// - `PuzzleError::Parse` if a token is not an integer.
pub fn parse_dimacs<R: BufRead>(reader: R) -> PuzzleResult<Cnf> {
    let mut cnf = Cnf::default();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek() {
            Some(&"%") => break,
            None | Some(&"c" | &"p") => {}
            Some(_) => {
                let literals = parts
                    .map(|token| {
                        token.parse::<i32>().map_err(|e| PuzzleError::Parse {
                            line: number + 1,
                            message: format!("failed to parse literal '{token}': {e}"),
                        })
                    })
                    .filter(|literal| !matches!(literal, Ok(0)))
                    .collect::<PuzzleResult<Vec<i32>>>()?;

                if !literals.is_empty() {
                    cnf.add_clause(Clause::new(literals)?);
                }
            }
        }
    }

    Ok(cnf)
}

/// Parses the DIMACS file at `path`.
///
/// # Errors
///
/// See [`parse_dimacs`]; also fails if the file cannot be opened.
pub fn parse_file<P: AsRef<Path>>(path: P) -> PuzzleResult<Cnf> {
    let file = std::fs::File::open(path)?;
    parse_dimacs(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_simple_dimacs() {
        let dimacs_content = "c This is a comment\n\
                              p cnf 3 2\n\
                              1 -2 0\n\
                              2 3 0\n";
        let cnf = parse_dimacs(Cursor::new(dimacs_content)).unwrap();

        assert_eq!(cnf.len(), 2, "Should parse 2 clauses");
        assert_eq!(cnf.num_vars(), 3);
        assert_eq!(cnf.clauses()[0].literals(), &[1, -2]);
        assert_eq!(cnf.clauses()[1].literals(), &[2, 3]);
    }

    #[test]
    fn test_parse_dimacs_with_empty_lines_and_end_marker() {
        let dimacs_content = "p cnf 2 2\n\
                              \n\
                              1 0\n\
                              \n\
                              -2 0\n\
                              %\n\
                              c this should be ignored";
        let cnf = parse_dimacs(Cursor::new(dimacs_content)).unwrap();

        assert_eq!(cnf.len(), 2);
        assert_eq!(cnf.num_vars(), 2);
        assert_eq!(cnf.clauses()[0][0], 1);
        assert_eq!(cnf.clauses()[1][0], -2);
    }

    #[test]
    fn test_parse_dimacs_lone_zero() {
        let cnf = parse_dimacs(Cursor::new("p cnf 1 1\n0\n")).unwrap();
        assert!(cnf.is_empty(), "Should parse 0 clauses");
    }

    #[test]
    fn test_parse_dimacs_malformed_literal() {
        let err = parse_dimacs(Cursor::new("1 abc 0\n")).unwrap_err();
        assert!(matches!(err, PuzzleError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_round_trip_through_to_dimacs() {
        let cnf = Cnf::from_literals(vec![vec![1, -3], vec![2]]).unwrap();
        let parsed = parse_dimacs(Cursor::new(cnf.to_dimacs())).unwrap();
        assert_eq!(parsed, cnf);
    }
}
