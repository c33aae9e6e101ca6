//! Deductions that only look at a single row or column.
//!
//! A line is a slice of [`Marking`]s. Every function here treats rows and columns the same
//! way; the grid solver copies columns out of the grid before calling in.

use crate::error::{PuzzleError, PuzzleResult};
use crate::nonogram::clue::Clue;
use crate::nonogram::marking::Marking;
use crate::sat::solver::MAX_ENUMERATION_BITS;
use log::trace;

/// Whether every cell of the line is `Filled` or `Eliminated`.
#[must_use]
pub fn is_confirmed(line: &[Marking]) -> bool {
    line.iter().all(|m| m.is_resolved())
}

/// Whether at least one cell of the line is `Filled` or `Eliminated`.
#[must_use]
pub fn is_partially_solved(line: &[Marking]) -> bool {
    line.iter().any(|m| m.is_resolved())
}

/// Narrows `line` using `clue`. Never turns a known cell back into an unknown one.
///
/// The cases are tried in order, first match wins:
/// 1. the line is already confirmed;
/// 2. the clue is empty, so every cell is eliminated;
/// 3. a single run covers the whole line;
/// 4. the clue fits exactly, so its only placement is laid out;
/// 5. eliminated cells at either end are trimmed and the cases are retried on the inner window.
///
/// Anything else is left alone. In particular a filled cell touching an end is not extended
/// into a full run.
///
/// # Errors
///
/// `PuzzleError::ClueDoesNotFit` if the clue cannot be placed in the line at all.
pub fn solve_line(line: &mut [Marking], clue: &Clue) -> PuzzleResult<()> {
    clue.check_fits(line.len())?;

    let mut start = 0;
    let mut end = line.len();

    loop {
        let window = &mut line[start..end];

        if is_confirmed(window) {
            return Ok(());
        }

        if clue.is_empty() {
            window.fill(Marking::Eliminated);
            return Ok(());
        }

        if clue.len() == 1 && clue[0] == window.len() {
            window.fill(Marking::Filled);
            return Ok(());
        }

        if clue.is_exact_fit(window.len()) {
            lay_out_exact_fit(window, clue);
            return Ok(());
        }

        let leading = window
            .iter()
            .take_while(|&&m| m == Marking::Eliminated)
            .count();
        let trailing = window[leading..]
            .iter()
            .rev()
            .take_while(|&&m| m == Marking::Eliminated)
            .count();

        if leading == 0 && trailing == 0 {
            return Ok(());
        }

        trace!("trimming {leading} leading and {trailing} trailing eliminated cells");
        start += leading;
        end -= trailing;
    }
}

/// Writes the unique placement of `clue` into a line of exactly `clue.min_length()` cells.
pub(crate) fn lay_out_exact_fit(line: &mut [Marking], clue: &Clue) {
    debug_assert!(clue.is_exact_fit(line.len()));

    let mut cells = line.iter_mut();
    for (index, &run) in clue.iter().enumerate() {
        if index > 0 {
            if let Some(gap) = cells.next() {
                *gap = Marking::Eliminated;
            }
        }
        for cell in cells.by_ref().take(run) {
            *cell = Marking::Filled;
        }
    }
}

/// Eliminates every unknown cell once the line already holds as many filled cells as the
/// clue asks for. Assumes the filled cells are in the right places.
///
/// Returns the number of cells eliminated.
pub fn fill_in_gaps(line: &mut [Marking], clue: &Clue) -> usize {
    let filled = line.iter().filter(|m| m.is_filled()).count();
    if filled != clue.total() {
        return 0;
    }

    let mut eliminated = 0;
    for cell in line.iter_mut().filter(|m| **m == Marking::Unknown) {
        *cell = Marking::Eliminated;
        eliminated += 1;
    }
    eliminated
}

/// Leftmost packing of `clue` into `length` cells.
///
/// Each covered cell holds the 1-based index of its run; gaps and the unused tail hold 0.
///
/// # Errors
///
/// `PuzzleError::ClueDoesNotFit` if the clue is longer than the line.
pub fn low_extreme(length: usize, clue: &Clue) -> PuzzleResult<Vec<usize>> {
    clue.check_fits(length)?;

    let mut packed = vec![0; length];
    let mut index = 0;
    for (run_index, &run) in clue.iter().enumerate() {
        packed[index..index + run].fill(run_index + 1);
        index += run + 1;
    }
    Ok(packed)
}

/// Rightmost packing of `clue` into `length` cells, in the same encoding as [`low_extreme`].
///
/// # Errors
///
/// `PuzzleError::ClueDoesNotFit` if the clue is longer than the line.
pub fn high_extreme(length: usize, clue: &Clue) -> PuzzleResult<Vec<usize>> {
    let low = low_extreme(length, clue)?;
    let shift = length - clue.min_length();

    let mut high = vec![0; length];
    high[shift..].copy_from_slice(&low[..length - shift]);
    Ok(high)
}

/// Cells that are covered by the same run in both extreme packings.
///
/// The result has the length of `line`; forced cells are `Filled` and the rest `Unknown`.
/// Only the length of `line` is used, its contents are not consulted.
///
/// # Errors
///
/// `PuzzleError::ClueDoesNotFit` if the clue is longer than the line.
pub fn overlap(line: &[Marking], clue: &Clue) -> PuzzleResult<Vec<Marking>> {
    let low = low_extreme(line.len(), clue)?;
    let high = high_extreme(line.len(), clue)?;

    Ok(low
        .iter()
        .zip(&high)
        .map(|(&l, &h)| {
            if l >= 1 && l == h {
                Marking::Filled
            } else {
                Marking::Unknown
            }
        })
        .collect())
}

/// Copies the filled cells of `overlap` onto the unknown cells of `line`.
///
/// Returns how many cells were newly filled.
pub fn merge_overlap(line: &mut [Marking], overlap: &[Marking]) -> usize {
    let mut newly_filled = 0;
    for (cell, forced) in line.iter_mut().zip(overlap) {
        if forced.is_filled() && *cell == Marking::Unknown {
            *cell = Marking::Filled;
            newly_filled += 1;
        }
    }
    newly_filled
}

/// Writes `candidate` into the cells at `unknowns`.
///
/// The most significant of the `unknowns.len()` bits goes to the first position; a set bit
/// becomes `Filled`, a clear bit `Empty`.
pub(crate) fn fill_unknowns(cells: &mut [Marking], unknowns: &[usize], candidate: u64) {
    let width = unknowns.len();
    for (j, &position) in unknowns.iter().enumerate() {
        cells[position] = Marking::from((candidate >> (width - 1 - j)) & 1 == 1);
    }
}

/// Every completion of the unknown cells of `line` whose run-length encoding equals `clue`.
///
/// Candidates are visited from all-filled down to all-empty, so completions come out in
/// descending binary order. A line without unknown cells yields itself when it already
/// matches the clue.
///
/// # Errors
///
/// `PuzzleError::SearchSpaceTooLarge` if the line has more unknown cells than can be counted
/// in a `u64`.
pub fn completions(line: &[Marking], clue: &Clue) -> PuzzleResult<Vec<Vec<Marking>>> {
    let unknowns: Vec<usize> = line
        .iter()
        .enumerate()
        .filter_map(|(i, &m)| (m == Marking::Unknown).then_some(i))
        .collect();

    if unknowns.len() > MAX_ENUMERATION_BITS {
        return Err(PuzzleError::SearchSpaceTooLarge {
            unknowns: unknowns.len(),
            limit: MAX_ENUMERATION_BITS,
        });
    }

    let mut found = Vec::new();
    let mut candidate_line = line.to_vec();
    for candidate in (0..1_u64 << unknowns.len()).rev() {
        fill_unknowns(&mut candidate_line, &unknowns, candidate);
        if Clue::from_line(&candidate_line) == *clue {
            found.push(candidate_line.clone());
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Marking::{Eliminated as X, Empty as E, Filled as F, Unknown as U};

    fn clue(runs: &[usize]) -> Clue {
        Clue::new(runs.to_vec()).unwrap()
    }

    fn solved(line: &[Marking], runs: &[usize]) -> Vec<Marking> {
        let mut line = line.to_vec();
        solve_line(&mut line, &clue(runs)).unwrap();
        line
    }

    /// Every clue that fits in a line of `length` cells.
    fn clues_for(length: usize) -> Vec<Clue> {
        let mut clues: Vec<Clue> = (0..1_u32 << length)
            .map(|bits| Clue::from_bits((0..length).map(|i| bits >> i & 1 == 1)))
            .collect();
        clues.sort();
        clues.dedup();
        clues
    }

    /// Every line of `length` cells over unknown, filled and eliminated.
    fn partial_lines(length: usize) -> Vec<Vec<Marking>> {
        (0..3_usize.pow(u32::try_from(length).unwrap()))
            .map(|mut code| {
                (0..length)
                    .map(|_| {
                        let m = [U, F, X][code % 3];
                        code /= 3;
                        m
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_confirmed_line_is_unchanged() {
        let line = [F, X, F, F, X];
        assert_eq!(solved(&line, &[1, 1]), line.to_vec());
    }

    #[test]
    fn test_empty_clue_eliminates_everything() {
        assert_eq!(solved(&[U, F, U], &[]), vec![X, X, X]);
    }

    #[test]
    fn test_full_run() {
        assert_eq!(solved(&[U, U, U, U], &[4]), vec![F, F, F, F]);
    }

    #[test]
    fn test_exact_fit() {
        assert_eq!(solved(&[U; 6], &[2, 1, 1]), vec![F, F, X, F, X, F]);
    }

    #[test]
    fn test_trims_eliminated_ends() {
        assert_eq!(solved(&[X, U, U, U, X], &[3]), vec![X, F, F, F, X]);
        assert_eq!(
            solved(&[X, X, U, U, U, U, X], &[1, 2]),
            vec![X, X, F, X, F, F, X]
        );
        assert_eq!(solved(&[U, U, X], &[2]), vec![F, F, X]);
    }

    #[test]
    fn test_inner_window_with_empty_result() {
        assert_eq!(solved(&[X, U, U, U, U, X], &[2]), vec![X, U, U, U, U, X]);
    }

    #[test]
    fn test_underdetermined_line_is_unchanged() {
        assert_eq!(solved(&[U; 5], &[2, 1]), vec![U; 5]);
        assert_eq!(solved(&[F, U, U, U, U], &[2]), vec![F, U, U, U, U]);
    }

    #[test]
    fn test_clue_too_long() {
        let mut line = vec![U; 3];
        assert!(matches!(
            solve_line(&mut line, &clue(&[2, 2])),
            Err(PuzzleError::ClueDoesNotFit { .. })
        ));
    }

    #[test]
    fn test_solve_is_idempotent_and_monotone() {
        for length in 0..=6 {
            let clues = clues_for(length);
            for line in partial_lines(length) {
                for c in &clues {
                    let mut once = line.clone();
                    solve_line(&mut once, c).unwrap();

                    for (before, after) in line.iter().zip(&once) {
                        if before.is_resolved() {
                            assert_ne!(*after, U, "{line:?} with [{c}] lost a known cell");
                        }
                    }

                    let mut twice = once.clone();
                    solve_line(&mut twice, c).unwrap();
                    assert_eq!(once, twice, "{line:?} with [{c}] is not idempotent");
                }
            }
        }
    }

    #[test]
    fn test_fill_in_gaps() {
        let mut line = vec![U, F, U, F, U];
        assert_eq!(fill_in_gaps(&mut line, &clue(&[1, 1])), 3);
        assert_eq!(line, vec![X, F, X, F, X]);

        let mut line = vec![U, F, U, U, U];
        assert_eq!(fill_in_gaps(&mut line, &clue(&[1, 1])), 0);
        assert_eq!(line, vec![U, F, U, U, U]);
    }

    #[test]
    fn test_extremes() {
        let c = clue(&[2, 1]);
        assert_eq!(low_extreme(6, &c).unwrap(), vec![1, 1, 0, 2, 0, 0]);
        assert_eq!(high_extreme(6, &c).unwrap(), vec![0, 0, 1, 1, 0, 2]);
        assert_eq!(low_extreme(3, &Clue::empty()).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_overlap() {
        assert_eq!(overlap(&[U; 5], &clue(&[3])).unwrap(), vec![U, U, F, U, U]);
        assert_eq!(overlap(&[U; 5], &clue(&[2, 1])).unwrap(), vec![U, F, U, U, U]);
        assert_eq!(overlap(&[U; 4], &clue(&[2, 1])).unwrap(), vec![F, F, U, F]);
        assert_eq!(overlap(&[U; 4], &Clue::empty()).unwrap(), vec![U; 4]);
        assert!(overlap(&[U; 2], &clue(&[3])).is_err());
    }

    #[test]
    fn test_overlap_is_subset_of_every_completion() {
        for length in 0..=8 {
            let blank = vec![U; length];
            for c in clues_for(length) {
                let forced = overlap(&blank, &c).unwrap();
                for completion in completions(&blank, &c).unwrap() {
                    for (f, cell) in forced.iter().zip(&completion) {
                        if f.is_filled() {
                            assert_eq!(
                                *cell, F,
                                "[{c}] forced a cell that is empty in {completion:?}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_merge_overlap() {
        let mut line = vec![U, X, U, F];
        assert_eq!(merge_overlap(&mut line, &[F, F, F, F]), 2);
        assert_eq!(line, vec![F, X, F, F]);
    }

    #[test]
    fn test_completions_order() {
        let found = completions(&[U; 5], &clue(&[2, 1])).unwrap();
        assert_eq!(
            found,
            vec![
                vec![F, F, E, F, E],
                vec![F, F, E, E, F],
                vec![E, F, F, E, F],
            ]
        );
    }

    #[test]
    fn test_completions_keep_known_cells() {
        let found = completions(&[X, U, U, F], &clue(&[2])).unwrap();
        assert_eq!(found, vec![vec![X, E, F, F]]);
    }

    #[test]
    fn test_completions_find_hidden_line() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let length = rng.usize(1..=12);
            let truth: Vec<bool> = (0..length).map(|_| rng.bool()).collect();
            let c = Clue::from_bits(truth.iter().copied());
            let partial: Vec<Marking> = truth
                .iter()
                .map(|&filled| match (rng.bool(), filled) {
                    (true, _) => U,
                    (false, true) => F,
                    (false, false) => X,
                })
                .collect();

            let found = completions(&partial, &c).unwrap();
            assert!(!found.is_empty());
            for completion in &found {
                assert_eq!(Clue::from_line(completion), c);
            }
            let expected: Vec<Marking> = truth
                .iter()
                .zip(&partial)
                .map(|(&filled, &known)| if known == U { Marking::from(filled) } else { known })
                .collect();
            assert!(found.contains(&expected));
        }
    }

    #[test]
    fn test_completions_of_contradiction() {
        assert!(completions(&[F, F, F], &clue(&[1])).unwrap().is_empty());
    }
}
