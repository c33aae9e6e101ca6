use nonogram_sat::nonogram::parser::{parse_nonogram, write_nonogram};
use nonogram_sat::nonogram::{
    Clue, CompletionTarget, Nonogram, SolverConfig, brute_force_remaining, decode, encode_clue,
    heuristic_solve,
};
use nonogram_sat::sat::clause_list::{parse_clause_list, write_clause_list};
use nonogram_sat::sat::dimacs::parse_dimacs;
use nonogram_sat::sat::enumerate_all_solutions;
use std::io::Cursor;

#[test]
fn test_written_puzzle_solves_after_reading_back() {
    let mut rng = fastrand::Rng::with_seed(2024);
    let config = SolverConfig::default();

    for _ in 0..20 {
        let puzzle = Nonogram::random_with(&mut rng, 4, 5);
        let mut bytes = Vec::new();
        write_nonogram(&mut bytes, &puzzle, "pipeline").unwrap();

        let mut read = parse_nonogram(Cursor::new(bytes)).unwrap();
        assert_eq!(read, puzzle);

        let report = heuristic_solve(&mut read, &config).unwrap();
        if !report.solved {
            brute_force_remaining(&mut read, CompletionTarget::Clues, &config).unwrap();
        }
        assert!(read.satisfies_clues());
    }
}

#[test]
fn test_every_completion_decodes_to_its_clue() {
    let clue = Clue::new(vec![2, 1]).unwrap();
    let formulas = encode_clue(&clue, 5).unwrap();
    assert_eq!(formulas.len(), 3);

    for formula in &formulas {
        let mut bytes = Vec::new();
        write_clause_list(&mut bytes, formula).unwrap();
        let read = parse_clause_list(Cursor::new(bytes)).unwrap();
        assert_eq!(&read, formula);

        let puzzle = decode(&read).unwrap();
        assert_eq!(puzzle.rows(), 1);
        assert_eq!(puzzle.cols(), 5);
        assert_eq!(puzzle.row_clues(), &[clue.clone()]);
    }
}

#[test]
fn test_dimacs_output_reads_back() {
    let puzzle = Nonogram::from_index(2, 3, 0b110_011).unwrap();
    for formulas in puzzle.row_formulas().unwrap() {
        for formula in formulas {
            let read = parse_dimacs(Cursor::new(formula.to_dimacs())).unwrap();
            assert_eq!(read, formula);
            assert_eq!(
                enumerate_all_solutions(&read).unwrap(),
                enumerate_all_solutions(&formula).unwrap()
            );
        }
    }
}

#[test]
fn test_unsatisfiable_formula_stays_unsatisfiable_through_clause_list() {
    let formulas = encode_clue(&Clue::empty(), 0).unwrap();
    assert_eq!(formulas.len(), 1);

    let mut bytes = Vec::new();
    write_clause_list(&mut bytes, &formulas[0]).unwrap();
    let read = parse_clause_list(Cursor::new(bytes)).unwrap();
    assert_eq!(read, formulas[0]);
    assert!(matches!(
        decode(&read),
        Err(nonogram_sat::PuzzleError::Unsatisfiable)
    ));
}
