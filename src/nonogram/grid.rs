//! The puzzle itself: clues, the working grid and an optional ground truth.

use crate::error::{PuzzleError, PuzzleResult};
use crate::nonogram::clue::Clue;
use crate::nonogram::encoding::encode_clue;
use crate::nonogram::marking::Marking;
use crate::sat::cnf::Cnf;
use bit_vec::BitVec;
use itertools::Itertools;
use std::fmt::Display;

/// Largest grid, in cells, whose puzzles can be addressed by a `u64` index.
pub const MAX_INDEXED_CELLS: usize = 63;

/// A rows × cols nonogram.
///
/// The working grid is stored row-major. The ground truth, when known, is a row-major
/// `BitVec` with a set bit for every filled cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nonogram {
    rows: usize,
    cols: usize,
    grid: Vec<Marking>,
    solution: Option<BitVec>,
    row_clues: Vec<Clue>,
    col_clues: Vec<Clue>,
    row_confirmed: Vec<bool>,
    col_confirmed: Vec<bool>,
}

impl Nonogram {
    /// Builds a puzzle from its clues, with every cell unknown.
    ///
    /// The grid has one row per row clue and one column per column clue.
    ///
    /// # Errors
    ///
    /// `PuzzleError::ClueDoesNotFit` if a row clue is longer than the number of columns,
    /// or a column clue longer than the number of rows.
    pub fn new(row_clues: Vec<Clue>, col_clues: Vec<Clue>) -> PuzzleResult<Self> {
        let rows = row_clues.len();
        let cols = col_clues.len();

        for clue in &row_clues {
            clue.check_fits(cols)?;
        }
        for clue in &col_clues {
            clue.check_fits(rows)?;
        }

        Ok(Self::assemble(rows, cols, row_clues, col_clues, None))
    }

    /// Attaches a ground truth to the puzzle.
    ///
    /// The clues are not re-derived; use [`Nonogram::satisfies_clues`] on a solved grid to
    /// check consistency.
    ///
    /// # Errors
    ///
    /// `PuzzleError::DimensionMismatch` if `solution` does not have one bit per cell.
    pub fn with_solution(mut self, solution: BitVec) -> PuzzleResult<Self> {
        check_cells(self.rows, self.cols, &solution)?;
        self.solution = Some(solution);
        Ok(self)
    }

    /// Builds the puzzle whose ground truth is `solution`, deriving both sets of clues.
    ///
    /// # Errors
    ///
    /// `PuzzleError::DimensionMismatch` if `solution` does not have `rows * cols` bits.
    pub fn from_solution(rows: usize, cols: usize, solution: BitVec) -> PuzzleResult<Self> {
        check_cells(rows, cols, &solution)?;
        Ok(Self::from_ground_truth(rows, cols, solution))
    }

    /// A puzzle with a uniformly random ground truth.
    #[must_use]
    pub fn random(rows: usize, cols: usize) -> Self {
        Self::random_with(&mut fastrand::Rng::new(), rows, cols)
    }

    /// A puzzle with a random ground truth drawn from `rng`.
    pub fn random_with(rng: &mut fastrand::Rng, rows: usize, cols: usize) -> Self {
        let solution = BitVec::from_fn(rows * cols, |_| rng.bool());
        Self::from_ground_truth(rows, cols, solution)
    }

    /// The puzzle whose row-major cells are the bits of `index`, most significant bit first.
    ///
    /// # Errors
    ///
    /// `PuzzleError::IndexOutOfRange` if the grid has more than [`MAX_INDEXED_CELLS`] cells
    /// or `index` has bits beyond the last cell.
    pub fn from_index(rows: usize, cols: usize, index: u64) -> PuzzleResult<Self> {
        let cells = rows * cols;
        if cells > MAX_INDEXED_CELLS || index >> cells != 0 {
            return Err(PuzzleError::IndexOutOfRange { index, rows, cols });
        }
        Ok(Self::from_ground_truth(rows, cols, index_bits(cells, index)))
    }

    /// Every rows × cols puzzle, in ascending index order.
    ///
    /// # Errors
    ///
    /// `PuzzleError::IndexOutOfRange` if the grid has more than [`MAX_INDEXED_CELLS`] cells.
    pub fn every_puzzle(rows: usize, cols: usize) -> PuzzleResult<impl Iterator<Item = Self>> {
        let cells = rows * cols;
        if cells > MAX_INDEXED_CELLS {
            return Err(PuzzleError::IndexOutOfRange {
                index: u64::MAX,
                rows,
                cols,
            });
        }
        Ok((0..1_u64 << cells)
            .map(move |index| Self::from_ground_truth(rows, cols, index_bits(cells, index))))
    }

    fn from_ground_truth(rows: usize, cols: usize, solution: BitVec) -> Self {
        let row_clues = (0..rows)
            .map(|r| Clue::from_bits((0..cols).map(|c| solution[r * cols + c])))
            .collect();
        let col_clues = (0..cols)
            .map(|c| Clue::from_bits((0..rows).map(|r| solution[r * cols + c])))
            .collect();
        Self::assemble(rows, cols, row_clues, col_clues, Some(solution))
    }

    fn assemble(
        rows: usize,
        cols: usize,
        row_clues: Vec<Clue>,
        col_clues: Vec<Clue>,
        solution: Option<BitVec>,
    ) -> Self {
        Self {
            rows,
            cols,
            grid: vec![Marking::Unknown; rows * cols],
            solution,
            row_clues,
            col_clues,
            row_confirmed: vec![false; rows],
            col_confirmed: vec![false; cols],
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// The clue of every row, top to bottom.
    #[must_use]
    pub fn row_clues(&self) -> &[Clue] {
        &self.row_clues
    }

    /// The clue of every column, left to right.
    #[must_use]
    pub fn col_clues(&self) -> &[Clue] {
        &self.col_clues
    }

    /// The ground truth, if known.
    #[must_use]
    pub const fn solution(&self) -> Option<&BitVec> {
        self.solution.as_ref()
    }

    /// Whether the ground truth is known.
    #[must_use]
    pub const fn has_solution(&self) -> bool {
        self.solution.is_some()
    }

    /// The whole working grid, row-major.
    #[must_use]
    pub fn cells(&self) -> &[Marking] {
        &self.grid
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Marking] {
        &mut self.grid
    }

    /// The marking at `row`, `col`.
    ///
    /// # Panics
    ///
    /// If the position is outside the grid.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Marking {
        assert!(col < self.cols, "column {col} out of range");
        self.grid[row * self.cols + col]
    }

    /// A view of row `row` in the working grid.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Marking] {
        &self.grid[row * self.cols..(row + 1) * self.cols]
    }

    /// Copies column `col` out of the working grid.
    #[must_use]
    pub fn column(&self, col: usize) -> Vec<Marking> {
        self.grid
            .iter()
            .skip(col)
            .step_by(self.cols.max(1))
            .copied()
            .collect()
    }

    /// Overwrites row `row` of the working grid.
    ///
    /// # Panics
    ///
    /// If `line` is not exactly one row long.
    pub fn set_row(&mut self, row: usize, line: &[Marking]) {
        self.grid[row * self.cols..(row + 1) * self.cols].copy_from_slice(line);
    }

    /// Overwrites column `col` of the working grid.
    ///
    /// # Panics
    ///
    /// If `line` is not exactly one column long.
    pub fn set_column(&mut self, col: usize, line: &[Marking]) {
        assert_eq!(line.len(), self.rows, "column has {} cells", self.rows);
        for (row, &marking) in line.iter().enumerate() {
            self.grid[row * self.cols + col] = marking;
        }
    }

    /// Whether row `row` has been confirmed by the solver.
    #[must_use]
    pub fn is_row_confirmed(&self, row: usize) -> bool {
        self.row_confirmed[row]
    }

    /// Whether column `col` has been confirmed by the solver.
    #[must_use]
    pub fn is_col_confirmed(&self, col: usize) -> bool {
        self.col_confirmed[col]
    }

    pub(crate) fn confirm_row(&mut self, row: usize) {
        self.row_confirmed[row] = true;
    }

    pub(crate) fn confirm_col(&mut self, col: usize) {
        self.col_confirmed[col] = true;
    }

    /// Whether every cell of the working grid is `Filled` or `Eliminated`.
    #[must_use]
    pub fn is_fully_confirmed(&self) -> bool {
        self.grid.iter().all(|m| m.is_resolved())
    }

    /// Whether the filled cells of the working grid are exactly those of the ground truth.
    ///
    /// False when there is no ground truth.
    #[must_use]
    pub fn matches_solution(&self) -> bool {
        self.solution.as_ref().is_some_and(|solution| {
            self.grid
                .iter()
                .zip(solution.iter())
                .all(|(m, filled)| m.is_filled() == filled)
        })
    }

    /// Whether the run-length encoding of every row and column equals its clue.
    #[must_use]
    pub fn satisfies_clues(&self) -> bool {
        (0..self.rows).all(|r| Clue::from_line(self.row(r)) == self.row_clues[r])
            && (0..self.cols).all(|c| Clue::from_line(&self.column(c)) == self.col_clues[c])
    }

    /// Number of filled cells the row clues describe.
    #[must_use]
    pub fn clue_cell_count(&self) -> usize {
        self.row_clues.iter().map(Clue::total).sum()
    }

    /// Positions, row-major, of every `Unknown` cell.
    #[must_use]
    pub fn unknown_cells(&self) -> Vec<usize> {
        self.grid
            .iter()
            .positions(|&m| m == Marking::Unknown)
            .collect()
    }

    /// Clears the working grid and every confirmation flag. Clues and ground truth stay.
    pub fn reset(&mut self) {
        self.grid.fill(Marking::Unknown);
        self.row_confirmed.fill(false);
        self.col_confirmed.fill(false);
    }

    /// CNF alternatives for every row clue, top to bottom.
    ///
    /// # Errors
    ///
    /// Propagates encoder failures.
    pub fn row_formulas(&self) -> PuzzleResult<Vec<Vec<Cnf>>> {
        self.row_clues
            .iter()
            .map(|clue| encode_clue(clue, self.cols))
            .collect()
    }

    /// CNF alternatives for every column clue, left to right.
    ///
    /// # Errors
    ///
    /// Propagates encoder failures.
    pub fn column_formulas(&self) -> PuzzleResult<Vec<Vec<Cnf>>> {
        self.col_clues
            .iter()
            .map(|clue| encode_clue(clue, self.rows))
            .collect()
    }
}

fn check_cells(rows: usize, cols: usize, solution: &BitVec) -> PuzzleResult<()> {
    if solution.len() == rows * cols {
        Ok(())
    } else {
        Err(PuzzleError::DimensionMismatch {
            what: "cells",
            expected: rows * cols,
            found: solution.len(),
        })
    }
}

fn index_bits(cells: usize, index: u64) -> BitVec {
    BitVec::from_fn(cells, |p| (index >> (cells - 1 - p)) & 1 == 1)
}

impl Display for Nonogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..self.rows {
            writeln!(
                f,
                "{}  | {}",
                self.row(r).iter().join(" "),
                self.row_clues[r]
            )?;
        }
        write!(
            f,
            "columns: {}",
            self.col_clues.iter().map(|c| format!("[{c}]")).join(" ")
        )
    }
}
