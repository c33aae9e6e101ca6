#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Formulas in conjunctive normal form.

use crate::error::PuzzleResult;
use crate::sat::clause::{Clause, Literal, Variable, var_of_lit};
use bit_vec::BitVec;
use itertools::Itertools;
use std::fmt::Display;

/// AND of [`Clause`]s, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Cnf {
    clauses: Vec<Clause>,
}

impl Cnf {
    /// A formula over the given clauses.
    #[must_use]
    pub const fn new(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    /// Builds a formula from raw literal lists.
    ///
    /// # Errors
    ///
    /// `PuzzleError::InvalidLiteral` if any literal is `0`.
    pub fn from_literals<I, C>(clauses: I) -> PuzzleResult<Self>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = Literal>,
    {
        let clauses = clauses
            .into_iter()
            .map(Clause::new)
            .collect::<PuzzleResult<Vec<_>>>()?;
        Ok(Self { clauses })
    }

    /// Appends a clause.
    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// The clauses in insertion order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether the formula has no clauses. The empty formula is always satisfied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Sorted union of the variables of every clause.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        self.clauses
            .iter()
            .flat_map(Clause::variables)
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// The highest variable id referenced, or 0 for a formula without literals.
    ///
    /// Assignments for this formula have this many bits.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.clauses
            .iter()
            .flat_map(Clause::iter)
            .map(|&l| var_of_lit(l))
            .max()
            .unwrap_or(0)
    }

    /// Whether every clause is satisfied by `assignment`.
    #[must_use]
    pub fn evaluate(&self, assignment: &BitVec) -> bool {
        self.clauses.iter().all(|clause| clause.evaluate(assignment))
    }

    /// Letter rendering, `(A v ~B) ^ (C)`. The empty formula renders as `(empty SAT)`.
    #[must_use]
    pub fn to_letters(&self) -> String {
        if self.clauses.is_empty() {
            return "(empty SAT)".to_string();
        }
        self.clauses
            .iter()
            .map(|clause| format!("({})", clause.to_letters()))
            .join(" ^ ")
    }

    /// DIMACS rendering, with a `p cnf` problem line and `0`-terminated clauses.
    #[must_use]
    pub fn to_dimacs(&self) -> String {
        let mut out = format!("p cnf {} {}\n", self.num_vars(), self.clauses.len());
        for clause in &self.clauses {
            for literal in clause.iter() {
                out.push_str(&literal.to_string());
                out.push(' ');
            }
            out.push_str("0\n");
        }
        out
    }
}

impl FromIterator<Clause> for Cnf {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.clauses.iter().map(|clause| format!("({clause})")).format(" ^ ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cnf(clauses: Vec<Vec<i32>>) -> Cnf {
        Cnf::from_literals(clauses).unwrap()
    }

    #[test]
    fn test_variables_and_num_vars() {
        let formula = cnf(vec![vec![1, -3], vec![3, 5], vec![-1]]);
        assert_eq!(formula.variables(), vec![1, 3, 5]);
        assert_eq!(formula.num_vars(), 5);
        assert_eq!(Cnf::default().num_vars(), 0);
    }

    #[test]
    fn test_evaluate() {
        let formula = cnf(vec![vec![1, 2], vec![-1]]);
        let sat: BitVec = [false, true].into_iter().collect();
        let unsat: BitVec = [true, true].into_iter().collect();
        assert!(formula.evaluate(&sat));
        assert!(!formula.evaluate(&unsat));
        assert!(Cnf::default().evaluate(&BitVec::new()));
    }

    #[test]
    fn test_add_clause() {
        let mut formula = Cnf::default();
        formula.add_clause(Clause::unit(2).unwrap());
        assert_eq!(formula.len(), 1);
        assert_eq!(formula.variables(), vec![2]);
    }

    #[test]
    fn test_rejects_zero_literal() {
        assert!(Cnf::from_literals(vec![vec![1, 0]]).is_err());
    }

    #[test]
    fn test_display() {
        let formula = cnf(vec![vec![1, -2], vec![3]]);
        assert_eq!(formula.to_string(), "(1 v ~2) ^ (3)");
        assert_eq!(formula.to_letters(), "(A v ~B) ^ (C)");
        assert_eq!(Cnf::default().to_letters(), "(empty SAT)");
        assert_eq!(Cnf::default().to_string(), "");
    }

    #[test]
    fn test_to_dimacs() {
        let formula = cnf(vec![vec![1, -2], vec![3]]);
        assert_eq!(formula.to_dimacs(), "p cnf 3 2\n1 -2 0\n3 0\n");
    }
}
