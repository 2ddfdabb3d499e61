//! Semantic containers for the knowledge the engine accumulates: literals,
//! clauses, hint formulas and the knowledge base itself.

use std::fmt;

use crate::grid::CellId;

/// A signed statement about one cell: positive means "is a mine", negative
/// means "is safe".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    cell: CellId,
    is_mine: bool,
}

impl Literal {
    pub fn new(cell: CellId, is_mine: bool) -> Self {
        Literal { cell, is_mine }
    }

    pub fn mine(cell: CellId) -> Self {
        Literal::new(cell, true)
    }

    pub fn safe(cell: CellId) -> Self {
        Literal::new(cell, false)
    }

    pub fn cell(self) -> CellId {
        self.cell
    }

    pub fn is_mine(self) -> bool {
        self.is_mine
    }

    pub fn negated(self) -> Self {
        Literal::new(self.cell, !self.is_mine)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_mine {
            write!(f, "~")?;
        }
        write!(f, "{}", self.cell.get())
    }
}

/// How the clauses inside a formula combine with each other.
///
/// The grouping is decided by the encoding strategy, never by a clause
/// itself: under [`ClauseGrouping::Disjunctive`] a formula is a disjunction
/// of conjunctive clauses (DNF), under [`ClauseGrouping::Conjunctive`] a
/// conjunction of disjunctive clauses (CNF).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseGrouping {
    Disjunctive,
    Conjunctive,
}

/// The full constraint derived from one hint: an ordered sequence of clauses,
/// each an ordered sequence of literals.
///
/// Stored arena-style (one growable literal buffer plus clause boundaries)
/// so the recursive encoders can append branches without copying partial
/// clauses around. Clause and literal order are exactly the order in which
/// the encoder produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula {
    literals: Vec<Literal>,
    /// End offset of each clause within `literals`.
    bounds: Vec<usize>,
}

impl Formula {
    pub fn new() -> Self {
        Formula::default()
    }

    /// Append one clause, preserving literal order.
    pub fn push_clause(&mut self, lits: impl IntoIterator<Item = Literal>) {
        self.literals.extend(lits);
        self.bounds.push(self.literals.len());
    }

    pub fn clause_count(&self) -> usize {
        self.bounds.len()
    }

    pub fn clause(&self, i: usize) -> &[Literal] {
        let start = if i == 0 { 0 } else { self.bounds[i - 1] };
        &self.literals[start..self.bounds[i]]
    }

    pub fn clauses(&self) -> impl Iterator<Item = &[Literal]> {
        (0..self.clause_count()).map(|i| self.clause(i))
    }

    /// A formula with no clauses, or a single clause with no literals,
    /// carries no information and must not enter the knowledge base.
    pub fn is_informative(&self) -> bool {
        match self.bounds.as_slice() {
            [] => false,
            [end] => *end != 0,
            _ => true,
        }
    }
}

/// The agent's entire accumulated knowledge: an ordered, append-only
/// conjunction of hint formulas.
///
/// Formulas are write-once: a hint contributes at most one formula, and a
/// formula is never revisited even when the hint's neighborhood later
/// shrinks.
#[derive(Debug)]
pub struct KnowledgeBase {
    grouping: ClauseGrouping,
    formulas: Vec<Formula>,
}

impl KnowledgeBase {
    pub fn new(grouping: ClauseGrouping) -> Self {
        KnowledgeBase {
            grouping,
            formulas: Vec::new(),
        }
    }

    pub fn grouping(&self) -> ClauseGrouping {
        self.grouping
    }

    pub fn push(&mut self, formula: Formula) {
        self.formulas.push(formula);
    }

    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellIds, Point};

    fn ids() -> CellIds {
        CellIds::new(5)
    }

    #[test]
    fn formula_preserves_clause_and_literal_order() {
        let a = ids().id(Point::new(0, 0));
        let b = ids().id(Point::new(1, 0));

        let mut formula = Formula::new();
        formula.push_clause([Literal::safe(a), Literal::mine(b)]);
        formula.push_clause([Literal::mine(a)]);

        assert_eq!(formula.clause_count(), 2);
        assert_eq!(formula.clause(0), &[Literal::safe(a), Literal::mine(b)]);
        assert_eq!(formula.clause(1), &[Literal::mine(a)]);
    }

    #[test]
    fn empty_shapes_are_not_informative() {
        let empty = Formula::new();
        assert!(!empty.is_informative());

        let mut lone_empty_clause = Formula::new();
        lone_empty_clause.push_clause([]);
        assert!(!lone_empty_clause.is_informative());

        let mut unit = Formula::new();
        unit.push_clause([Literal::mine(ids().id(Point::new(0, 0)))]);
        assert!(unit.is_informative());
    }

    #[test]
    fn knowledge_base_only_grows() {
        let mut kb = KnowledgeBase::new(ClauseGrouping::Conjunctive);
        assert!(kb.is_empty());

        let mut formula = Formula::new();
        formula.push_clause([Literal::safe(ids().id(Point::new(2, 2)))]);
        kb.push(formula.clone());
        kb.push(formula);

        assert_eq!(kb.len(), 2);
        assert_eq!(kb.grouping(), ClauseGrouping::Conjunctive);
    }

    #[test]
    fn literal_negation_flips_sign_only() {
        let cell = ids().id(Point::new(3, 1));
        let lit = Literal::mine(cell);
        assert_eq!(lit.negated(), Literal::safe(cell));
        assert_eq!(lit.negated().negated(), lit);
        assert_eq!(lit.cell(), cell);
    }
}
