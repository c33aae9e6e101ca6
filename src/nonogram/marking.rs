use crate::error::PuzzleError;
use std::fmt::Display;

/// State of a single cell in the working grid.
///
/// `Empty` and `Eliminated` both mean "not filled": `Empty` comes from ground truth or a
/// brute-force candidate, `Eliminated` is a deduction made by the solver. `Speculative`
/// is reserved and never produced by the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i8)]
pub enum Marking {
    /// Nothing is known about the cell.
    #[default]
    Unknown = -1,
    /// Known to be empty.
    Empty = 0,
    /// Known to be filled.
    Filled = 1,
    /// Tentatively marked by a player.
    Speculative = 2,
    /// Ruled out by propagation.
    Eliminated = 3,
}

impl Marking {
    /// Whether the cell counts towards a run.
    #[must_use]
    pub const fn is_filled(self) -> bool {
        matches!(self, Self::Filled)
    }

    /// Whether the cell has been settled by the solver, i.e. it is `Filled` or `Eliminated`.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Filled | Self::Eliminated)
    }
}

impl From<bool> for Marking {
    fn from(filled: bool) -> Self {
        if filled { Self::Filled } else { Self::Empty }
    }
}

impl From<Marking> for i8 {
    fn from(marking: Marking) -> Self {
        marking as Self
    }
}

impl TryFrom<i8> for Marking {
    type Error = PuzzleError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Unknown),
            0 => Ok(Self::Empty),
            1 => Ok(Self::Filled),
            2 => Ok(Self::Speculative),
            3 => Ok(Self::Eliminated),
            _ => Err(PuzzleError::InvalidMarking(value)),
        }
    }
}

impl Display for Marking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "?"),
            Self::Empty => write!(f, "."),
            Self::Filled => write!(f, "#"),
            Self::Speculative => write!(f, "o"),
            Self::Eliminated => write!(f, "x"),
        }
    }
}
