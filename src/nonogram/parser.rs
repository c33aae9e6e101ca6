//! Reading and writing puzzles in the line-oriented `.dat` layout.
//!
//! ```text
//! # Randomly generated nonogram, nonogram_2x3_13.dat
//! 2 3
//! 1
//! 1 1
//! 1
//!
//! 2
//! 0 0 1
//! 1 0 1
//! ```
//!
//! After the comment and the `<rows> <cols>` header come one line per row clue, then one
//! per column clue; a blank line is an empty clue. Any remaining lines hold the ground
//! truth, one row of `0`/`1` values per line. Every number is followed by a space.

use crate::error::{PuzzleError, PuzzleResult};
use crate::nonogram::clue::Clue;
use crate::nonogram::grid::Nonogram;
use bit_vec::BitVec;
use log::debug;
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Reads a puzzle, with its ground truth when the input has one.
///
/// # Errors
///
/// - `PuzzleError::Io` if reading fails.
/// - `PuzzleError::Parse` for a missing line or a malformed number.
/// - `PuzzleError::InvalidClue` for a zero run.
/// - `PuzzleError::ClueDoesNotFit` if a clue is longer than its line.
/// - `PuzzleError::DimensionMismatch` if the ground truth has the wrong shape.
pub fn parse_nonogram<R: BufRead>(reader: R) -> PuzzleResult<Nonogram> {
    let lines = reader.lines().collect::<io::Result<Vec<String>>>()?;
    let line_at = |index: usize, what: &str| {
        lines.get(index).ok_or_else(|| PuzzleError::Parse {
            line: index + 1,
            message: format!("missing {what}"),
        })
    };

    let header = numbers(line_at(1, "size header")?, 1)?;
    let (rows, cols) = match header.as_slice() {
        [rows, cols] => (*rows, *cols),
        _ => {
            return Err(PuzzleError::Parse {
                line: 2,
                message: format!("expected '<rows> <cols>', found {} numbers", header.len()),
            });
        }
    };

    let mut row_clues = Vec::with_capacity(rows);
    for r in 0..rows {
        row_clues.push(Clue::new(numbers(line_at(2 + r, "row clue")?, 2 + r)?)?);
    }
    let mut col_clues = Vec::with_capacity(cols);
    for c in 0..cols {
        let index = 2 + rows + c;
        col_clues.push(Clue::new(numbers(line_at(index, "column clue")?, index)?)?);
    }

    let puzzle = Nonogram::new(row_clues, col_clues)?;

    let first_grid_line = 2 + rows + cols;
    let grid_lines: Vec<(usize, &String)> = lines
        .iter()
        .enumerate()
        .skip(first_grid_line)
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();
    if grid_lines.is_empty() {
        return Ok(puzzle);
    }
    if grid_lines.len() != rows {
        return Err(PuzzleError::DimensionMismatch {
            what: "ground truth rows",
            expected: rows,
            found: grid_lines.len(),
        });
    }

    let mut ground_truth = BitVec::with_capacity(rows * cols);
    for (index, line) in grid_lines {
        let values = numbers(line, index)?;
        if values.len() != cols {
            return Err(PuzzleError::DimensionMismatch {
                what: "ground truth columns",
                expected: cols,
                found: values.len(),
            });
        }
        for value in values {
            match value {
                0 => ground_truth.push(false),
                1 => ground_truth.push(true),
                _ => {
                    return Err(PuzzleError::Parse {
                        line: index + 1,
                        message: format!("ground truth cell must be 0 or 1, found {value}"),
                    });
                }
            }
        }
    }

    puzzle.with_solution(ground_truth)
}

/// Parses the whitespace-separated numbers of 0-based line `index`.
fn numbers(line: &str, index: usize) -> PuzzleResult<Vec<usize>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<usize>().map_err(|e| PuzzleError::Parse {
                line: index + 1,
                message: format!("failed to parse '{token}': {e}"),
            })
        })
        .collect()
}

/// Reads the puzzle file at `path`.
///
/// # Errors
///
/// See [`parse_nonogram`]; also fails if the file cannot be opened.
pub fn parse_nonogram_file<P: AsRef<Path>>(path: P) -> PuzzleResult<Nonogram> {
    let file = std::fs::File::open(path)?;
    parse_nonogram(io::BufReader::new(file))
}

/// Writes `puzzle` with `comment` on the first line.
///
/// The ground truth is written only when the puzzle has one.
///
/// # Errors
///
/// `PuzzleError::Io` if writing fails.
pub fn write_nonogram<W: Write>(
    mut writer: W,
    puzzle: &Nonogram,
    comment: &str,
) -> PuzzleResult<()> {
    writeln!(writer, "# {comment}")?;
    writeln!(writer, "{} {}", puzzle.rows(), puzzle.cols())?;

    for clue in puzzle.row_clues().iter().chain(puzzle.col_clues()) {
        for run in clue.iter() {
            write!(writer, "{run} ")?;
        }
        writeln!(writer)?;
    }

    if let Some(solution) = puzzle.solution() {
        for r in 0..puzzle.rows() {
            for c in 0..puzzle.cols() {
                write!(writer, "{} ", u8::from(solution[r * puzzle.cols() + c]))?;
            }
            writeln!(writer)?;
        }
    }

    Ok(())
}

/// Writes `puzzle` to a new file at `path`. Never overwrites an existing file.
///
/// # Errors
///
/// `PuzzleError::Io` if the file exists or cannot be written.
pub fn write_nonogram_file<P: AsRef<Path>>(path: P, puzzle: &Nonogram) -> PuzzleResult<()> {
    let path = path.as_ref();
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let mut writer = io::BufWriter::new(file);
    write_nonogram(
        &mut writer,
        puzzle,
        &format!("Randomly generated nonogram, {}", path.display()),
    )?;
    writer.flush()?;
    debug!("nonogram written to {}", path.display());
    Ok(())
}
