//! Run-length clues for a single row or column.

use crate::error::{PuzzleError, PuzzleResult};
use crate::nonogram::marking::Marking;
use itertools::Itertools;
use std::fmt::Display;
use std::ops::Deref;

/// Ordered run lengths describing the filled segments of one line.
///
/// Every run is positive. The empty clue describes a line with no filled cells.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Clue(Vec<usize>);

impl Clue {
    /// Builds a clue, rejecting runs of length zero.
    ///
    /// # Errors
    ///
    /// `PuzzleError::InvalidClue` if any run is zero.
    pub fn new(runs: Vec<usize>) -> PuzzleResult<Self> {
        if runs.contains(&0) {
            return Err(PuzzleError::InvalidClue(runs));
        }
        Ok(Self(runs))
    }

    /// The clue of a line with no filled cells.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Run-length encodes the `Filled` cells of a line.
    ///
    /// Every marking other than `Filled` separates runs.
    #[must_use]
    pub fn from_line(line: &[Marking]) -> Self {
        Self::from_bits(line.iter().map(|m| m.is_filled()))
    }

    /// Run-length encodes a sequence of cell values, `true` meaning filled.
    pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        Self(
            bits.into_iter()
                .dedup_with_count()
                .filter_map(|(count, filled)| filled.then_some(count))
                .collect(),
        )
    }

    /// The run lengths in order.
    #[must_use]
    pub fn runs(&self) -> &[usize] {
        &self.0
    }

    /// Number of filled cells the clue describes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Smallest line that can hold the clue: every run plus one gap between neighbours.
    #[must_use]
    pub fn min_length(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.total() + self.0.len() - 1
        }
    }

    /// Whether the clue fits in a line of `length` cells.
    #[must_use]
    pub fn fits(&self, length: usize) -> bool {
        self.min_length() <= length
    }

    /// Whether the clue has exactly one placement in a line of `length` cells.
    #[must_use]
    pub fn is_exact_fit(&self, length: usize) -> bool {
        self.min_length() == length
    }

    /// Fails unless the clue fits in a line of `length` cells.
    ///
    /// # Errors
    ///
    /// `PuzzleError::ClueDoesNotFit` when the clue is too long.
    pub fn check_fits(&self, length: usize) -> PuzzleResult<()> {
        if self.fits(length) {
            Ok(())
        } else {
            Err(PuzzleError::ClueDoesNotFit {
                clue: self.to_string(),
                required: self.min_length(),
                length,
            })
        }
    }

    /// The unique line of `min_length()` cells satisfying this clue.
    #[must_use]
    pub fn exact_fit_line(&self) -> Vec<Marking> {
        let mut line = vec![Marking::Unknown; self.min_length()];
        crate::nonogram::line::lay_out_exact_fit(&mut line, self);
        line
    }
}

impl Deref for Clue {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Clue> for Vec<usize> {
    fn from(clue: Clue) -> Self {
        clue.0
    }
}

impl TryFrom<Vec<usize>> for Clue {
    type Error = PuzzleError;

    fn try_from(runs: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(runs)
    }
}

impl Display for Clue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}
