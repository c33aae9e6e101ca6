//! A disjunction of literals.
//!
//! Literals are plain `i32`s: the magnitude is the 1-based variable id and the sign is the
//! polarity. Most clauses produced by the nonogram encoder are short, so literals live in a
//! `SmallVec` that stays inline up to eight entries.

use crate::error::{PuzzleError, PuzzleResult};
use bit_vec::BitVec;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::Display;
use std::ops::Index;

/// A signed literal.
pub type Literal = i32;

/// A 1-based variable id.
pub type Variable = usize;

/// The variable a literal refers to.
#[must_use]
pub const fn var_of_lit(literal: Literal) -> Variable {
    literal.unsigned_abs() as Variable
}

/// OR of literals, in insertion order. Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Clause {
    literals: SmallVec<[Literal; 8]>,
}

impl Clause {
    /// Builds a clause from its literals.
    ///
    /// # Errors
    ///
    /// `PuzzleError::InvalidLiteral` if any literal is `0`.
    pub fn new<I: IntoIterator<Item = Literal>>(literals: I) -> PuzzleResult<Self> {
        let literals: SmallVec<[Literal; 8]> = literals.into_iter().collect();
        if literals.contains(&0) {
            return Err(PuzzleError::InvalidLiteral);
        }
        Ok(Self { literals })
    }

    /// A clause holding the single literal `literal`.
    ///
    /// # Errors
    ///
    /// `PuzzleError::InvalidLiteral` if `literal` is `0`.
    pub fn unit(literal: Literal) -> PuzzleResult<Self> {
        Self::new([literal])
    }

    /// The literals in insertion order.
    #[must_use]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Number of literals, counting duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether the clause has no literals. An empty clause is never satisfied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Whether the clause has exactly one literal.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// Iterates over the literals.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    /// Sorted, distinct variable ids mentioned by the clause.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        self.literals
            .iter()
            .map(|&l| var_of_lit(l))
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// Whether some literal is satisfied by `assignment`, where bit `k` is variable `k + 1`.
    ///
    /// Variables past the end of the assignment read as false.
    #[must_use]
    pub fn evaluate(&self, assignment: &BitVec) -> bool {
        self.literals.iter().any(|&literal| {
            let value = assignment.get(var_of_lit(literal) - 1).unwrap_or(false);
            value == (literal > 0)
        })
    }

    /// Renders the clause with variables as letters, `1` as `A` and so on.
    ///
    /// Variables beyond `Z` keep their number.
    #[must_use]
    pub fn to_letters(&self) -> String {
        self.literals
            .iter()
            .map(|&literal| {
                let var = var_of_lit(literal);
                let name = u8::try_from(var)
                    .ok()
                    .filter(|v| (1..=26).contains(v))
                    .map_or_else(|| var.to_string(), |v| char::from(b'@' + v).to_string());
                if literal < 0 { format!("~{name}") } else { name }
            })
            .join(" v ")
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl TryFrom<Vec<Literal>> for Clause {
    type Error = PuzzleError;

    fn try_from(literals: Vec<Literal>) -> Result<Self, Self::Error> {
        Self::new(literals)
    }
}

impl TryFrom<&[Literal]> for Clause {
    type Error = PuzzleError;

    fn try_from(literals: &[Literal]) -> Result<Self, Self::Error> {
        Self::new(literals.iter().copied())
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = self.literals.iter().map(|&literal| {
            if literal < 0 {
                format!("~{}", var_of_lit(literal))
            } else {
                literal.to_string()
            }
        });
        write!(f, "{}", rendered.format(" v "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let clause = Clause::new([1, -2, 3]).unwrap();
        assert_eq!(clause.len(), 3);
        assert_eq!(clause[1], -2);
        assert!(!clause.is_unit());
    }

    #[test]
    fn test_rejects_zero() {
        assert!(matches!(
            Clause::new([1, 0]),
            Err(PuzzleError::InvalidLiteral)
        ));
    }

    #[test]
    fn test_variables_are_sorted_and_distinct() {
        let clause = Clause::new([3, -1, 1, 2, -3]).unwrap();
        assert_eq!(clause.variables(), vec![1, 2, 3]);
    }

    #[test]
    fn test_evaluate() {
        let clause = Clause::new([-1, -2, -3]).unwrap();
        let assignment: BitVec = [false, false, true].into_iter().collect();
        assert!(clause.evaluate(&assignment));

        let all_true = BitVec::from_elem(3, true);
        assert!(!clause.evaluate(&all_true));
    }

    #[test]
    fn test_missing_variable_reads_false() {
        let clause = Clause::new([5]).unwrap();
        assert!(!clause.evaluate(&BitVec::from_elem(2, true)));

        let clause = Clause::new([-5]).unwrap();
        assert!(clause.evaluate(&BitVec::from_elem(2, true)));
    }

    #[test]
    fn test_empty_clause_is_false() {
        let clause = Clause::new(Vec::new()).unwrap();
        assert!(clause.is_empty());
        assert!(!clause.evaluate(&BitVec::from_elem(1, true)));
    }

    #[test]
    fn test_display() {
        let clause = Clause::new([1, -2, 30]).unwrap();
        assert_eq!(clause.to_string(), "1 v ~2 v 30");
        assert_eq!(clause.to_letters(), "A v ~B v 30");
        assert_eq!(Clause::unit(-26).unwrap().to_letters(), "~Z");
    }
}
