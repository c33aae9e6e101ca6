#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Grid-level solving: repeated line passes, then an optional exhaustive fallback.
//!
//! [`heuristic_solve`] alternates between rows and columns, applying the extreme-packing
//! overlap and the line solver to each unconfirmed line until the puzzle is solved, a pass
//! makes no progress, or the deduction budget runs out. Whatever is left can be handed to
//! [`brute_force_remaining`], which tries every assignment of the unknown cells.

use crate::error::{PuzzleError, PuzzleResult};
use crate::nonogram::clue::Clue;
use crate::nonogram::grid::Nonogram;
use crate::nonogram::line::{
    fill_in_gaps, fill_unknowns, is_confirmed, merge_overlap, overlap, solve_line,
};
use crate::nonogram::marking::Marking;
use crate::sat::solver::MAX_ENUMERATION_BITS;
use log::{debug, info, trace};

/// When the heuristic solver considers a puzzle solved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StopCriterion {
    /// Every cell is `Filled` or `Eliminated`.
    #[default]
    FullyConfirmed,
    /// The filled cells equal the ground truth. Needs a puzzle with a known solution.
    MatchesSolution,
}

impl StopCriterion {
    fn holds(self, puzzle: &Nonogram) -> bool {
        match self {
            Self::FullyConfirmed => puzzle.is_fully_confirmed(),
            Self::MatchesSolution => puzzle.matches_solution(),
        }
    }
}

/// Knobs for the grid solver and the brute-force fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Scales the deduction budget, which is `sanity_coefficient * (rows + cols)`.
    pub sanity_coefficient: f64,
    /// When to stop the heuristic passes.
    pub stop_criterion: StopCriterion,
    /// Most unknown cells brute force will enumerate. Clamped to 63.
    pub max_brute_force_cells: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            sanity_coefficient: 1.0,
            stop_criterion: StopCriterion::default(),
            max_brute_force_cells: 24,
        }
    }
}

impl SolverConfig {
    /// The deduction budget for a rows × cols puzzle. Negative products give zero.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn budget(&self, rows: usize, cols: usize) -> usize {
        (self.sanity_coefficient * (rows + cols) as f64)
            .floor()
            .max(0.0) as usize
    }

    fn brute_force_limit(&self) -> usize {
        self.max_brute_force_cells.min(MAX_ENUMERATION_BITS)
    }
}

/// What a call to [`heuristic_solve`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveReport {
    /// Budget at the start.
    pub budget: usize,
    /// Budget left when the solver stopped.
    pub budget_remaining: usize,
    /// Number of full row-then-column passes.
    pub passes: usize,
    /// Whether the solver stopped because a pass changed nothing.
    pub stalled: bool,
    /// Whether the stop criterion held at the end.
    pub solved: bool,
}

/// Runs line passes over `puzzle` until it is solved, stalls, or the budget runs out.
///
/// Running out of budget is not an error; check [`SolveReport::solved`].
///
/// # Errors
///
/// - `PuzzleError::NoKnownSolution` when the criterion is `MatchesSolution` and the puzzle
///   has no ground truth.
/// - `PuzzleError::ClueDoesNotFit` if a clue is longer than its line.
pub fn heuristic_solve(puzzle: &mut Nonogram, config: &SolverConfig) -> PuzzleResult<SolveReport> {
    if config.stop_criterion == StopCriterion::MatchesSolution && !puzzle.has_solution() {
        return Err(PuzzleError::NoKnownSolution);
    }

    let budget = config.budget(puzzle.rows(), puzzle.cols());
    let mut report = SolveReport {
        budget,
        budget_remaining: budget,
        ..SolveReport::default()
    };

    while report.budget_remaining > 0 {
        report.passes += 1;
        let before = puzzle.cells().to_vec();

        for row in 0..puzzle.rows() {
            if puzzle.is_row_confirmed(row) {
                continue;
            }
            let mut line = puzzle.row(row).to_vec();
            let confirmed = deduce(&mut line, &puzzle.row_clues()[row], &mut report)?;
            puzzle.set_row(row, &line);
            if confirmed {
                puzzle.confirm_row(row);
            }
        }

        for col in 0..puzzle.cols() {
            if puzzle.is_col_confirmed(col) {
                continue;
            }
            let mut line = puzzle.column(col);
            let confirmed = deduce(&mut line, &puzzle.col_clues()[col], &mut report)?;
            puzzle.set_column(col, &line);
            if confirmed {
                puzzle.confirm_col(col);
            }
        }

        debug!(
            "pass {}: {} unknown cells, budget {}",
            report.passes,
            puzzle.unknown_cells().len(),
            report.budget_remaining
        );

        if config.stop_criterion.holds(puzzle) {
            break;
        }
        if puzzle.cells() == before.as_slice() {
            report.stalled = true;
            break;
        }
        report.budget_remaining = report.budget_remaining.saturating_sub(1);
    }

    report.solved = config.stop_criterion.holds(puzzle);
    info!(
        "heuristic solve finished after {} passes: solved={}, stalled={}",
        report.passes, report.solved, report.stalled
    );
    Ok(report)
}

/// One line step of a pass. Returns whether the line ended up confirmed.
fn deduce(line: &mut [Marking], clue: &Clue, report: &mut SolveReport) -> PuzzleResult<bool> {
    let forced = overlap(line, clue)?;
    let newly_filled = merge_overlap(line, &forced);
    if newly_filled > 0 {
        trace!("overlap of [{clue}] filled {newly_filled} cells");
        if is_confirmed(line) {
            return Ok(true);
        }
    }

    solve_line(line, clue)?;
    if is_confirmed(line) {
        return Ok(true);
    }

    let eliminated = fill_in_gaps(line, clue);
    if eliminated > 0 {
        trace!("[{clue}] is complete, eliminated {eliminated} gap cells");
    }
    report.budget_remaining = report.budget_remaining.saturating_sub(1);
    Ok(false)
}

/// What an exhaustive completion must agree with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionTarget {
    /// The puzzle's ground truth.
    KnownSolution,
    /// The row and column clues.
    Clues,
}

/// Tries every assignment of the unknown cells until one satisfies `target`, and writes it
/// into the grid as `Filled`/`Empty` cells.
///
/// Candidates run from all-filled down when the first row's clue covers more than half the
/// row, and from all-empty up otherwise. The first unknown cell in row-major order takes
/// the most significant bit.
///
/// Returns the number of candidates rejected before the accepted one, so zero when the
/// first candidate wins.
///
/// # Errors
///
/// - `PuzzleError::SearchSpaceTooLarge` when there are more unknown cells than
///   `config.max_brute_force_cells` allows.
/// - `PuzzleError::NoKnownSolution` when the target is `KnownSolution` and the puzzle has
///   no ground truth.
/// - `PuzzleError::SearchExhausted` when no candidate satisfies the target; the grid is
///   left unchanged.
pub fn brute_force_remaining(
    puzzle: &mut Nonogram,
    target: CompletionTarget,
    config: &SolverConfig,
) -> PuzzleResult<usize> {
    if target == CompletionTarget::KnownSolution && !puzzle.has_solution() {
        return Err(PuzzleError::NoKnownSolution);
    }

    let unknowns = puzzle.unknown_cells();
    let limit = config.brute_force_limit();
    if unknowns.len() > limit {
        return Err(PuzzleError::SearchSpaceTooLarge {
            unknowns: unknowns.len(),
            limit,
        });
    }

    let descending = puzzle
        .row_clues()
        .first()
        .is_some_and(|clue| 2 * clue.total() > puzzle.cols());
    debug!(
        "brute forcing {} unknown cells, {}",
        unknowns.len(),
        if descending { "descending" } else { "ascending" }
    );

    let original = puzzle.cells().to_vec();
    let space = 1_u64 << unknowns.len();
    let candidates: Box<dyn Iterator<Item = u64>> = if descending {
        Box::new((0..space).rev())
    } else {
        Box::new(0..space)
    };

    let mut rejected = 0;
    for candidate in candidates {
        fill_unknowns(puzzle.cells_mut(), &unknowns, candidate);
        let accepted = match target {
            CompletionTarget::KnownSolution => puzzle.matches_solution(),
            CompletionTarget::Clues => puzzle.satisfies_clues(),
        };
        if accepted {
            info!("brute force accepted candidate {candidate:#b} after {rejected} rejections");
            return Ok(rejected);
        }
        rejected += 1;
    }

    puzzle.cells_mut().copy_from_slice(&original);
    Err(PuzzleError::SearchExhausted { tried: rejected })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bit_vec::BitVec;

    fn clues(list: &[&[usize]]) -> Vec<Clue> {
        list.iter().map(|c| Clue::new(c.to_vec()).unwrap()).collect()
    }

    #[test]
    fn test_budget() {
        let config = SolverConfig::default();
        assert_eq!(config.budget(3, 4), 7);

        let config = SolverConfig {
            sanity_coefficient: 2.5,
            ..SolverConfig::default()
        };
        assert_eq!(config.budget(3, 4), 17);

        let config = SolverConfig {
            sanity_coefficient: -1.0,
            ..SolverConfig::default()
        };
        assert_eq!(config.budget(3, 4), 0);
    }

    #[test]
    fn test_empty_clues_eliminate_everything() {
        let mut puzzle = Nonogram::new(clues(&[&[], &[], &[]]), clues(&[&[], &[], &[]])).unwrap();
        let report = heuristic_solve(&mut puzzle, &SolverConfig::default()).unwrap();

        assert!(report.solved);
        assert!(puzzle.is_fully_confirmed());
        assert!(puzzle.cells().iter().all(|&m| m == Marking::Eliminated));
        assert_eq!(report.passes, 1);
    }

    #[test]
    fn test_exact_fit_rows_take_one_pass() {
        let mut puzzle = Nonogram::new(
            clues(&[&[1, 1], &[3], &[1, 1]]),
            clues(&[&[3], &[1], &[3]]),
        )
        .unwrap();
        let report = heuristic_solve(&mut puzzle, &SolverConfig::default()).unwrap();

        assert!(report.solved);
        assert_eq!(report.passes, 1);
        assert!(report.budget_remaining >= puzzle.cols());
        assert!(puzzle.satisfies_clues());
        assert!((0..3).all(|r| puzzle.is_row_confirmed(r)));
        assert!((0..3).all(|c| puzzle.is_col_confirmed(c)));
    }

    #[test]
    fn test_overlap_drives_progress() {
        // 1 x 5 with a single run of 5 in disguise: columns are all [1].
        let mut puzzle =
            Nonogram::new(clues(&[&[5]]), clues(&[&[1], &[1], &[1], &[1], &[1]])).unwrap();
        let report = heuristic_solve(&mut puzzle, &SolverConfig::default()).unwrap();
        assert!(report.solved);
        assert!(puzzle.cells().iter().all(|&m| m == Marking::Filled));
    }

    #[test]
    fn test_ambiguous_puzzle_stalls() {
        // Two diagonal solutions; no line deduction applies.
        let mut puzzle = Nonogram::new(clues(&[&[1], &[1]]), clues(&[&[1], &[1]])).unwrap();
        let report = heuristic_solve(&mut puzzle, &SolverConfig::default()).unwrap();

        assert!(!report.solved);
        assert!(report.stalled);
        assert_eq!(report.passes, 1);
        assert_eq!(puzzle.unknown_cells().len(), 4);
    }

    #[test]
    fn test_zero_budget_does_nothing() {
        let mut puzzle = Nonogram::from_index(2, 2, 0b1111).unwrap();
        let config = SolverConfig {
            sanity_coefficient: 0.0,
            ..SolverConfig::default()
        };
        let report = heuristic_solve(&mut puzzle, &config).unwrap();
        assert_eq!(report.passes, 0);
        assert!(!report.solved);
    }

    #[test]
    fn test_matches_solution_needs_ground_truth() {
        let mut puzzle = Nonogram::new(clues(&[&[1]]), clues(&[&[1]])).unwrap();
        let config = SolverConfig {
            stop_criterion: StopCriterion::MatchesSolution,
            ..SolverConfig::default()
        };
        assert!(matches!(
            heuristic_solve(&mut puzzle, &config),
            Err(PuzzleError::NoKnownSolution)
        ));
    }

    #[test]
    fn test_matches_solution_criterion() {
        let mut puzzle = Nonogram::from_index(2, 3, 0b111_000).unwrap();
        let config = SolverConfig {
            stop_criterion: StopCriterion::MatchesSolution,
            ..SolverConfig::default()
        };
        let report = heuristic_solve(&mut puzzle, &config).unwrap();
        assert!(report.solved);
        assert!(puzzle.matches_solution());
    }

    #[test]
    fn test_brute_force_ambiguous_by_clues() {
        let mut puzzle = Nonogram::new(clues(&[&[1], &[1]]), clues(&[&[1], &[1]])).unwrap();
        heuristic_solve(&mut puzzle, &SolverConfig::default()).unwrap();

        brute_force_remaining(&mut puzzle, CompletionTarget::Clues, &SolverConfig::default())
            .unwrap();
        assert!(puzzle.satisfies_clues());
        assert!(puzzle.unknown_cells().is_empty());
    }

    #[test]
    fn test_brute_force_known_solution() {
        // Anti-diagonal 0110 runs ascending; candidates 0 to 5 are rejected.
        let mut puzzle = Nonogram::from_index(2, 2, 0b0110).unwrap();
        let tried = brute_force_remaining(
            &mut puzzle,
            CompletionTarget::KnownSolution,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(tried, 6);
        assert!(puzzle.matches_solution());
        assert_eq!(puzzle.cell(0, 0), Marking::Empty);
        assert_eq!(puzzle.cell(0, 1), Marking::Filled);
    }

    #[test]
    fn test_brute_force_descending_when_first_row_is_heavy() {
        let mut puzzle = Nonogram::from_index(2, 2, 0b1111).unwrap();
        let tried = brute_force_remaining(
            &mut puzzle,
            CompletionTarget::KnownSolution,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(tried, 0);
    }

    #[test]
    fn test_brute_force_errors() {
        let mut no_truth = Nonogram::new(clues(&[&[1]]), clues(&[&[1]])).unwrap();
        assert!(matches!(
            brute_force_remaining(
                &mut no_truth,
                CompletionTarget::KnownSolution,
                &SolverConfig::default()
            ),
            Err(PuzzleError::NoKnownSolution)
        ));

        let mut big = Nonogram::from_index(3, 3, 0).unwrap();
        let config = SolverConfig {
            max_brute_force_cells: 4,
            ..SolverConfig::default()
        };
        assert!(matches!(
            brute_force_remaining(&mut big, CompletionTarget::Clues, &config),
            Err(PuzzleError::SearchSpaceTooLarge {
                unknowns: 9,
                limit: 4
            })
        ));
    }

    #[test]
    fn test_brute_force_exhausted_restores_grid() {
        let mut puzzle = Nonogram::from_solution(1, 2, BitVec::from_elem(2, true)).unwrap();
        puzzle.set_row(0, &[Marking::Eliminated, Marking::Unknown]);
        let err = brute_force_remaining(
            &mut puzzle,
            CompletionTarget::KnownSolution,
            &SolverConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PuzzleError::SearchExhausted { tried: 2 }));
        assert_eq!(puzzle.row(0), &[Marking::Eliminated, Marking::Unknown]);
    }

    #[test]
    fn test_every_3x3_puzzle_completes() {
        let config = SolverConfig::default();
        for mut puzzle in Nonogram::every_puzzle(3, 3).unwrap() {
            let report = heuristic_solve(&mut puzzle, &config).unwrap();
            if report.solved {
                assert!(puzzle.satisfies_clues(), "{puzzle}");
                continue;
            }
            brute_force_remaining(&mut puzzle, CompletionTarget::Clues, &config).unwrap();
            assert!(puzzle.satisfies_clues(), "{puzzle}");
        }
    }
}
