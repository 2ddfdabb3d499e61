//! The satisfiability oracle: the abstract capability the inference loop
//! queries, plus the varisat-backed implementation.

use varisat::{ExtendFormula, Lit, Solver, Var};

use crate::logic::{ClauseGrouping, KnowledgeBase, Literal};

/// Outcome of one satisfiability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Satisfiable,
    Unsatisfiable,
    /// The backend failed or timed out. Never proof of anything.
    Unknown,
}

/// Abstract satisfiability checker over a knowledge base.
///
/// The engine never inspects models; it only asks whether the knowledge base
/// together with one extra assumed literal can hold at all.
pub trait SatOracle {
    /// Is `kb ∧ assumption` satisfiable?
    fn check(&mut self, kb: &KnowledgeBase, assumption: Literal) -> Verdict;

    /// Entailment test: the knowledge base proves `assumption.negated()`
    /// exactly when conjoining `assumption` is unsatisfiable. [`Verdict::Unknown`]
    /// resolves to "cannot prove", never to proof.
    fn refutes(&mut self, kb: &KnowledgeBase, assumption: Literal) -> bool {
        self.check(kb, assumption) == Verdict::Unsatisfiable
    }
}

/// Oracle backed by a fresh [`varisat::Solver`] per query.
///
/// Conjunctive knowledge bases are already in the solver's clause shape and
/// pass straight through. Disjunctive ones are submitted structurally: each
/// conjunctive clause gets a selector variable implying its literals, and one
/// disjunction over the selectors keeps at least one scenario alive. Both
/// directions of every query stay equisatisfiable with the source formula,
/// so no text serialization round-trip is needed.
#[derive(Debug, Clone, Copy)]
pub struct VarisatOracle {
    /// Number of reserved cell variables; selectors are allocated above.
    cell_count: usize,
}

impl VarisatOracle {
    pub fn new(cell_count: usize) -> Self {
        VarisatOracle { cell_count }
    }

    fn to_solver_lit(cell_vars: &[Var], lit: Literal) -> Lit {
        Lit::from_var(cell_vars[lit.cell().index()], lit.is_mine())
    }
}

impl SatOracle for VarisatOracle {
    fn check(&mut self, kb: &KnowledgeBase, assumption: Literal) -> Verdict {
        let mut solver = Solver::new();
        let cell_vars: Vec<Var> = (0..self.cell_count).map(|_| solver.new_var()).collect();

        for formula in kb.formulas() {
            match kb.grouping() {
                ClauseGrouping::Conjunctive => {
                    for clause in formula.clauses() {
                        if clause.is_empty() {
                            // Trivially contradictory input short-circuits.
                            return Verdict::Unsatisfiable;
                        }
                        let lits: Vec<Lit> = clause
                            .iter()
                            .map(|&l| Self::to_solver_lit(&cell_vars, l))
                            .collect();
                        solver.add_clause(&lits);
                    }
                }
                ClauseGrouping::Disjunctive => {
                    if formula.clause_count() == 0 {
                        // An empty disjunction can never hold.
                        return Verdict::Unsatisfiable;
                    }
                    let mut selectors = Vec::with_capacity(formula.clause_count());
                    for clause in formula.clauses() {
                        let selector = Lit::from_var(solver.new_var(), true);
                        for &lit in clause {
                            solver.add_clause(&[!selector, Self::to_solver_lit(&cell_vars, lit)]);
                        }
                        selectors.push(selector);
                    }
                    solver.add_clause(&selectors);
                }
            }
        }

        solver.add_clause(&[Self::to_solver_lit(&cell_vars, assumption)]);

        match solver.solve() {
            Ok(true) => Verdict::Satisfiable,
            Ok(false) => Verdict::Unsatisfiable,
            Err(e) => {
                log::warn!("sat backend failed, treating query as unproven: {e}");
                Verdict::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{DecompositionEncoder, EnumerativeEncoder, HintEncoder};
    use crate::grid::{CellId, CellIds, Point};

    fn cells(n: usize) -> Vec<CellId> {
        let ids = CellIds::new(8);
        (0..n).map(|x| ids.id(Point::new(x, 0))).collect()
    }

    fn kb_with(encoder: &dyn HintEncoder, k: i32, cells: &[CellId]) -> KnowledgeBase {
        let mut kb = KnowledgeBase::new(encoder.grouping());
        kb.push(encoder.exist_k_mines(k, cells).unwrap());
        kb
    }

    #[test]
    fn all_safe_hint_refutes_every_mine_assumption() {
        let cs = cells(3);
        for encoder in [
            &EnumerativeEncoder as &dyn HintEncoder,
            &DecompositionEncoder as &dyn HintEncoder,
        ] {
            let kb = kb_with(encoder, 0, &cs);
            let mut oracle = VarisatOracle::new(8);
            for &c in &cs {
                assert!(oracle.refutes(&kb, Literal::mine(c)));
                assert!(!oracle.refutes(&kb, Literal::safe(c)));
            }
        }
    }

    #[test]
    fn all_mine_hint_refutes_every_safe_assumption() {
        let cs = cells(3);
        for encoder in [
            &EnumerativeEncoder as &dyn HintEncoder,
            &DecompositionEncoder as &dyn HintEncoder,
        ] {
            let kb = kb_with(encoder, 3, &cs);
            let mut oracle = VarisatOracle::new(8);
            for &c in &cs {
                assert!(oracle.refutes(&kb, Literal::safe(c)));
                assert!(!oracle.refutes(&kb, Literal::mine(c)));
            }
        }
    }

    #[test]
    fn symmetric_hint_proves_nothing() {
        let cs = cells(2);
        for encoder in [
            &EnumerativeEncoder as &dyn HintEncoder,
            &DecompositionEncoder as &dyn HintEncoder,
        ] {
            let kb = kb_with(encoder, 1, &cs);
            let mut oracle = VarisatOracle::new(8);
            for &c in &cs {
                assert_eq!(oracle.check(&kb, Literal::mine(c)), Verdict::Satisfiable);
                assert_eq!(oracle.check(&kb, Literal::safe(c)), Verdict::Satisfiable);
            }
        }
    }

    #[test]
    fn strategies_agree_on_every_query() {
        // Overlapping hints where joint reasoning proves the third cell safe:
        // exactly 1 mine in {a, b} and exactly 1 mine in {a, b, c}.
        let cs = cells(3);
        let (pair, triple) = (&cs[..2], &cs[..3]);

        let mut verdicts = Vec::new();
        for encoder in [
            &EnumerativeEncoder as &dyn HintEncoder,
            &DecompositionEncoder as &dyn HintEncoder,
        ] {
            let mut kb = KnowledgeBase::new(encoder.grouping());
            kb.push(encoder.exist_k_mines(1, pair).unwrap());
            kb.push(encoder.exist_k_mines(1, triple).unwrap());

            let mut oracle = VarisatOracle::new(8);
            let per_strategy: Vec<Verdict> = cs
                .iter()
                .flat_map(|&c| [Literal::mine(c), Literal::safe(c)])
                .map(|lit| oracle.check(&kb, lit))
                .collect();

            // c is forced safe, a and b stay open.
            assert_eq!(per_strategy[4], Verdict::Unsatisfiable);
            assert_eq!(per_strategy[5], Verdict::Satisfiable);
            verdicts.push(per_strategy);
        }
        assert_eq!(verdicts[0], verdicts[1]);
    }

    #[test]
    fn verdicts_are_idempotent_for_unchanged_kb() {
        let cs = cells(4);
        let kb = kb_with(&DecompositionEncoder, 2, &cs);
        let mut oracle = VarisatOracle::new(8);
        for &c in &cs {
            let first = oracle.check(&kb, Literal::mine(c));
            for _ in 0..3 {
                assert_eq!(oracle.check(&kb, Literal::mine(c)), first);
            }
        }
    }

    #[test]
    fn growing_the_kb_never_retracts_a_proof() {
        let cs = cells(3);
        let encoder = DecompositionEncoder;
        let mut kb = KnowledgeBase::new(encoder.grouping());
        kb.push(encoder.exist_k_mines(0, &cs[..2]).unwrap());

        let mut oracle = VarisatOracle::new(8);
        assert!(oracle.refutes(&kb, Literal::mine(cs[0])));

        // A consistent later hint must keep the earlier proof intact.
        kb.push(encoder.exist_k_mines(1, &cs).unwrap());
        assert!(oracle.refutes(&kb, Literal::mine(cs[0])));
        // And force the newly constrained cell the other way.
        assert!(oracle.refutes(&kb, Literal::safe(cs[2])));
    }
}
