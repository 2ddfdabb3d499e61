//! Encoders that turn one numeric hint into a logical formula asserting
//! "exactly k of these cells are mines".
//!
//! Two structurally different but logically equivalent strategies exist:
//! an enumerative one that spells out every mine placement as a DNF, and a
//! decomposition into at-most/at-least bounds that yields a CNF. Which one an
//! agent carries decides how its knowledge base is interpreted.

use crate::error::EngineError;
use crate::grid::CellId;
use crate::logic::{ClauseGrouping, Formula, Literal};

/// Encoding strategy for a single hint's constraint.
///
/// Callers must subtract already-marked mines from `k` and drop the marked
/// cells from `cells` before encoding; the encoder only ever sees cells that
/// are still unknown. A `k` outside `[0, cells.len()]` is a caller bug and
/// fails fast.
pub trait HintEncoder {
    /// How the clauses of the produced formulas combine.
    fn grouping(&self) -> ClauseGrouping;

    /// A formula equivalent to "exactly `k` of `cells` are mines, the other
    /// `cells.len() - k` are safe".
    fn exist_k_mines(&self, k: i32, cells: &[CellId]) -> Result<Formula, EngineError>;
}

fn check_bounds(k: i32, cells: &[CellId]) -> Result<usize, EngineError> {
    if k < 0 || k as usize > cells.len() {
        return Err(EngineError::EncodingContradiction {
            k,
            cell_count: cells.len(),
        });
    }
    Ok(k as usize)
}

/// Enumerative strategy: one conjunctive clause per possible placement of
/// the k mines, the clauses forming a disjunction.
///
/// Clause count grows as C(n, k), which is fine for the 8-neighbor cap this
/// engine operates under but rules the strategy out for wide constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumerativeEncoder;

impl EnumerativeEncoder {
    /// Case split on the first cell: either it is safe and k mines remain
    /// among the rest, or it is a mine and k-1 remain. The safe branch is
    /// emitted first. Literals decided so far ride along in `prefix`.
    fn split(k: usize, cells: &[CellId], prefix: &mut Vec<Literal>, out: &mut Formula) {
        if k == 0 || k == cells.len() {
            // k == 0: every remaining cell is safe; k == len: all are mines.
            let is_mine = k != 0;
            out.push_clause(
                prefix
                    .iter()
                    .copied()
                    .chain(cells.iter().map(|&c| Literal::new(c, is_mine))),
            );
            return;
        }
        let Some((&first, rest)) = cells.split_first() else {
            return;
        };

        prefix.push(Literal::safe(first));
        Self::split(k, rest, prefix, out);
        prefix.pop();

        prefix.push(Literal::mine(first));
        Self::split(k - 1, rest, prefix, out);
        prefix.pop();
    }
}

impl HintEncoder for EnumerativeEncoder {
    fn grouping(&self) -> ClauseGrouping {
        ClauseGrouping::Disjunctive
    }

    fn exist_k_mines(&self, k: i32, cells: &[CellId]) -> Result<Formula, EngineError> {
        let k = check_bounds(k, cells)?;
        let mut out = Formula::new();
        Self::split(k, cells, &mut Vec::new(), &mut out);
        Ok(out)
    }
}

/// Decomposition strategy: "exactly k" = "at most k mines" and "at least k
/// mines", the latter rewritten as "at most n-k safe". Each bound forbids
/// every subset one larger than the bound, one disjunctive clause per subset.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecompositionEncoder;

impl DecompositionEncoder {
    /// At most `k` of `cells` hold the sign opposite to `clause_sign`; every
    /// subset of size k+1 yields one clause of `clause_sign` literals
    /// ("not all of these are mines" / "not all of these are safe").
    ///
    /// Recursion splits on whether the first cell is excluded from the
    /// subset (emitted first) or included, decrementing the bound only on
    /// inclusion. Base cases: k == -1 emits the accumulated subset
    /// unconditionally, k == count learns nothing, k == count-1 makes the
    /// whole cell set the one forbidden subset.
    fn at_most(k: i32, cells: &[CellId], clause_sign: bool, prefix: &mut Vec<Literal>, out: &mut Formula) {
        let count = cells.len() as i32;
        if k == -1 {
            out.push_clause(prefix.iter().copied());
            return;
        }
        if k == count {
            return;
        }
        if k == count - 1 {
            out.push_clause(
                prefix
                    .iter()
                    .copied()
                    .chain(cells.iter().map(|&c| Literal::new(c, clause_sign))),
            );
            return;
        }
        let Some((&first, rest)) = cells.split_first() else {
            return;
        };

        Self::at_most(k, rest, clause_sign, prefix, out);

        prefix.push(Literal::new(first, clause_sign));
        Self::at_most(k - 1, rest, clause_sign, prefix, out);
        prefix.pop();
    }

    /// At most `k` of `cells` are mines. `k == -1` is a legal degenerate
    /// bound (no subset of size zero exists); `k > cells.len()` is not.
    pub fn at_most_k_mines(&self, k: i32, cells: &[CellId]) -> Formula {
        debug_assert!(k <= cells.len() as i32);
        let mut out = Formula::new();
        // Forbidden subsets are all-mine, so clause literals say "safe".
        Self::at_most(k, cells, false, &mut Vec::new(), &mut out);
        out
    }

    /// At least `k` of `cells` are mines, as "at most n-k of them are safe".
    pub fn at_least_k_mines(&self, k: i32, cells: &[CellId]) -> Formula {
        debug_assert!(k >= 0);
        let safe_bound = cells.len() as i32 - k;
        let mut out = Formula::new();
        // Forbidden subsets are all-safe, so clause literals say "mine".
        Self::at_most(safe_bound, cells, true, &mut Vec::new(), &mut out);
        out
    }
}

impl HintEncoder for DecompositionEncoder {
    fn grouping(&self) -> ClauseGrouping {
        ClauseGrouping::Conjunctive
    }

    fn exist_k_mines(&self, k: i32, cells: &[CellId]) -> Result<Formula, EngineError> {
        let _ = check_bounds(k, cells)?;
        let mut out = self.at_most_k_mines(k, cells);
        for clause in self.at_least_k_mines(k, cells).clauses() {
            out.push_clause(clause.iter().copied());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellIds, Point};

    fn two_cells() -> (CellId, CellId) {
        let ids = CellIds::new(5);
        (ids.id(Point::new(0, 0)), ids.id(Point::new(0, 1)))
    }

    #[test]
    fn enumerative_no_mines_is_one_all_safe_clause() {
        let (c1, c2) = two_cells();
        let formula = EnumerativeEncoder.exist_k_mines(0, &[c1, c2]).unwrap();
        assert_eq!(formula.clause_count(), 1);
        assert_eq!(formula.clause(0), &[Literal::safe(c1), Literal::safe(c2)]);
    }

    #[test]
    fn enumerative_all_mines_is_one_all_mine_clause() {
        let (c1, c2) = two_cells();
        let formula = EnumerativeEncoder.exist_k_mines(2, &[c1, c2]).unwrap();
        assert_eq!(formula.clause_count(), 1);
        assert_eq!(formula.clause(0), &[Literal::mine(c1), Literal::mine(c2)]);
    }

    #[test]
    fn enumerative_splits_safe_branch_first() {
        let (c1, c2) = two_cells();
        let formula = EnumerativeEncoder.exist_k_mines(1, &[c1, c2]).unwrap();
        assert_eq!(formula.clause_count(), 2);
        assert_eq!(formula.clause(0), &[Literal::safe(c1), Literal::mine(c2)]);
        assert_eq!(formula.clause(1), &[Literal::mine(c1), Literal::safe(c2)]);
    }

    #[test]
    fn enumerative_clause_count_is_n_choose_k() {
        let ids = CellIds::new(8);
        let cells: Vec<CellId> = (0..6).map(|x| ids.id(Point::new(x, 0))).collect();
        let formula = EnumerativeEncoder.exist_k_mines(2, &cells).unwrap();
        assert_eq!(formula.clause_count(), 15); // C(6, 2)
        for clause in formula.clauses() {
            assert_eq!(clause.len(), 6);
            assert_eq!(clause.iter().filter(|l| l.is_mine()).count(), 2);
        }
    }

    #[test]
    fn at_most_negative_bound_returns_bare_prefix() {
        let (c1, c2) = two_cells();
        let formula = DecompositionEncoder.at_most_k_mines(-1, &[c1, c2]);
        assert_eq!(formula.clause_count(), 1);
        assert_eq!(formula.clause(0), &[] as &[Literal]);
    }

    #[test]
    fn at_most_full_count_learns_nothing() {
        let (c1, c2) = two_cells();
        let formula = DecompositionEncoder.at_most_k_mines(2, &[c1, c2]);
        assert_eq!(formula.clause_count(), 0);
        assert!(!formula.is_informative());
    }

    #[test]
    fn at_most_count_minus_one_is_single_full_clause() {
        let (c1, c2) = two_cells();
        let formula = DecompositionEncoder.at_most_k_mines(1, &[c1, c2]);
        assert_eq!(formula.clause_count(), 1);
        assert_eq!(formula.clause(0), &[Literal::safe(c1), Literal::safe(c2)]);
    }

    #[test]
    fn at_most_excluded_branch_comes_first() {
        let (c1, c2) = two_cells();
        let formula = DecompositionEncoder.at_most_k_mines(0, &[c1, c2]);
        assert_eq!(formula.clause_count(), 2);
        assert_eq!(formula.clause(0), &[Literal::safe(c2)]);
        assert_eq!(formula.clause(1), &[Literal::safe(c1)]);
    }

    #[test]
    fn at_least_is_at_most_safe_dual() {
        let (c1, c2) = two_cells();
        // At least 2 mines of 2 cells: no safe cell allowed, one unit clause
        // per cell in excluded-first order.
        let formula = DecompositionEncoder.at_least_k_mines(2, &[c1, c2]);
        assert_eq!(formula.clause_count(), 2);
        assert_eq!(formula.clause(0), &[Literal::mine(c2)]);
        assert_eq!(formula.clause(1), &[Literal::mine(c1)]);
    }

    #[test]
    fn decomposition_concatenates_at_most_then_at_least() {
        let (c1, c2) = two_cells();
        let formula = DecompositionEncoder.exist_k_mines(1, &[c1, c2]).unwrap();
        // at most 1 mine: one clause; at least 1 mine = at most 1 safe: one clause.
        assert_eq!(formula.clause_count(), 2);
        assert_eq!(formula.clause(0), &[Literal::safe(c1), Literal::safe(c2)]);
        assert_eq!(formula.clause(1), &[Literal::mine(c1), Literal::mine(c2)]);
    }

    #[test]
    fn out_of_range_k_fails_fast() {
        let (c1, c2) = two_cells();
        for encoder in [
            &EnumerativeEncoder as &dyn HintEncoder,
            &DecompositionEncoder as &dyn HintEncoder,
        ] {
            assert!(matches!(
                encoder.exist_k_mines(-1, &[c1, c2]),
                Err(EngineError::EncodingContradiction { k: -1, cell_count: 2 })
            ));
            assert!(matches!(
                encoder.exist_k_mines(3, &[c1, c2]),
                Err(EngineError::EncodingContradiction { k: 3, cell_count: 2 })
            ));
        }
    }

    #[test]
    fn empty_candidate_set_with_zero_mines_is_uninformative() {
        // A hint whose unknown neighborhood emptied out contributes nothing.
        let formula = EnumerativeEncoder.exist_k_mines(0, &[]).unwrap();
        assert!(!formula.is_informative());
        let formula = DecompositionEncoder.exist_k_mines(0, &[]).unwrap();
        assert!(!formula.is_informative());
    }
}
