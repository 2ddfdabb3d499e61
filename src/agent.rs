//! Agents that play a [`Game`]: the shared probing/marking plumbing, the
//! SAT-driven inference loop, and the weaker single-neighborhood strategy.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use itertools::Itertools;

use crate::encode::{DecompositionEncoder, EnumerativeEncoder, HintEncoder};
use crate::error::EngineError;
use crate::grid::{CellId, CellIds, CellView, GridView, Point};
use crate::logic::{KnowledgeBase, Literal};
use crate::oracle::{SatOracle, VarisatOracle};
use crate::world::{Game, WorldCell};

/// How a playthrough ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Every safe cell probed.
    Solved,
    /// A mine was probed.
    Dead,
    /// No provable deduction left; the agent stopped rather than guess.
    GaveUp,
}

impl fmt::Display for PlayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayOutcome::Solved => write!(f, "Agent alive: all solved"),
            PlayOutcome::Dead => write!(f, "Agent dead: found mine"),
            PlayOutcome::GaveUp => write!(f, "Agent not terminated"),
        }
    }
}

/// Shared plumbing every agent owns: the game, the agent's private view of
/// the board, and the probe/mark primitives acting on both.
#[derive(Debug)]
struct Session {
    game: Game,
    view: GridView,
    verbose: bool,
}

impl Session {
    fn new(game: Game, verbose: bool) -> Self {
        let world = game.world();
        let view = GridView::covered(world.width(), world.height(), world.blocked_cells());
        Session {
            game,
            view,
            verbose,
        }
    }

    /// Probe a covered cell. A revealed zero hint auto-probes all of its
    /// covered neighbors, cascading breadth-first through the zero region.
    /// Returns whether anything was probed.
    fn probe(&mut self, at: Point) -> bool {
        if self.view.on(at) != CellView::Unknown {
            return false;
        }
        let mut queue = VecDeque::from([at]);
        while let Some(p) = queue.pop_front() {
            if self.view.on(p) != CellView::Unknown {
                continue;
            }
            match self.game.probe(p) {
                WorldCell::Blocked => self.view.set(p, CellView::Blocked),
                WorldCell::Mine => self.view.set(p, CellView::Exploded),
                WorldCell::Hint(n) => {
                    self.view.set(p, CellView::Hint(n));
                    if n == 0 {
                        queue.extend(self.covered_neighbors(p));
                    }
                }
            }
        }
        true
    }

    /// Flag a covered cell as a deduced mine.
    fn mark_mine(&mut self, at: Point) -> bool {
        if self.view.on(at) != CellView::Unknown {
            return false;
        }
        self.game.mark_mine();
        self.view.set(at, CellView::Marked);
        true
    }

    /// Open the game on the two cells the world guarantees safe: the
    /// top-left corner and the center of the board.
    fn initial_probes(&mut self) {
        let center = Point::new(self.view.width() / 2, self.view.height() / 2);
        for at in [Point::new(0, 0), center] {
            if self.probe(at) {
                self.report_step();
            }
        }
    }

    fn view_on(&self, at: Point) -> CellView {
        self.view.on(at)
    }

    fn hint_value(&self, at: Point) -> Option<u8> {
        match self.view.on(at) {
            CellView::Hint(n) => Some(n),
            _ => None,
        }
    }

    fn covered_neighbors(&self, at: Point) -> Vec<Point> {
        self.neighbors_in(at, |v| v == CellView::Unknown)
    }

    fn hint_neighbors(&self, at: Point) -> Vec<Point> {
        self.neighbors_in(at, |v| matches!(v, CellView::Hint(_)))
    }

    fn marked_neighbors(&self, at: Point) -> Vec<Point> {
        self.neighbors_in(at, |v| v == CellView::Marked)
    }

    fn neighbors_in(&self, at: Point, wanted: impl Fn(CellView) -> bool) -> Vec<Point> {
        self.view
            .neighbors(at)
            .filter(|&n| wanted(self.view.on(n)))
            .collect()
    }

    /// All still-covered cells, top to bottom, left to right. The inference
    /// loop's scan order.
    fn covered_cells(&self) -> Vec<Point> {
        let mut covered = Vec::with_capacity(self.game.covered_count());
        for y in 0..self.view.height() {
            for x in 0..self.view.width() {
                let at = Point::new(x, y);
                if self.view.on(at) == CellView::Unknown {
                    covered.push(at);
                }
            }
        }
        covered
    }

    /// Every hint adjacent to at least one covered cell, deduplicated in
    /// first-seen order.
    fn active_hints(&self) -> Vec<Point> {
        self.covered_cells()
            .into_iter()
            .flat_map(|c| self.hint_neighbors(c))
            .unique()
            .collect()
    }

    fn report_step(&self) {
        if self.verbose && !self.game.has_ended() {
            println!("{}", self.view);
        }
    }

    /// Close out the session: on a win the remaining covered cells can only
    /// be mines, so they are flagged in the final view.
    fn finish(&mut self) -> PlayOutcome {
        if self.game.has_won() {
            for at in self.covered_cells() {
                self.mark_mine(at);
            }
        }
        if !self.game.has_ended() {
            self.game.give_up();
        }
        if self.game.has_won() {
            PlayOutcome::Solved
        } else if self.game.has_lost() {
            PlayOutcome::Dead
        } else {
            PlayOutcome::GaveUp
        }
    }
}

/// SAT-driven agent: the inference loop written once against the encoder and
/// oracle traits, so both encoding strategies run the identical algorithm.
#[derive(Debug)]
pub struct SatAgent<E, O> {
    session: Session,
    ids: CellIds,
    encoder: E,
    oracle: O,
    kb: KnowledgeBase,
    /// Hints that already contributed their formula. Write-once per hint.
    contributed: HashSet<Point>,
}

impl SatAgent<EnumerativeEncoder, VarisatOracle> {
    /// Agent using the enumerative DNF encoding.
    pub fn enumerative(game: Game, verbose: bool) -> Self {
        SatAgent::with_parts(game, verbose, EnumerativeEncoder)
    }
}

impl SatAgent<DecompositionEncoder, VarisatOracle> {
    /// Agent using the at-most/at-least CNF decomposition.
    pub fn decomposition(game: Game, verbose: bool) -> Self {
        SatAgent::with_parts(game, verbose, DecompositionEncoder)
    }
}

impl<E: HintEncoder> SatAgent<E, VarisatOracle> {
    fn with_parts(game: Game, verbose: bool, encoder: E) -> Self {
        let world = game.world();
        let oracle = VarisatOracle::new(world.width() * world.height());
        let ids = CellIds::new(world.width());
        let kb = KnowledgeBase::new(encoder.grouping());
        SatAgent {
            session: Session::new(game, verbose),
            ids,
            encoder,
            oracle,
            kb,
            contributed: HashSet::new(),
        }
    }
}

impl<E: HintEncoder, O: SatOracle> SatAgent<E, O> {
    /// Play until the game ends or a full scan proves nothing new.
    ///
    /// Each round first folds every newly active hint into the knowledge
    /// base, then scans all covered cells in row-major order, probing the
    /// provably safe and marking the provably mined. A round counts as
    /// changed only when it probed something.
    pub fn play(&mut self) -> Result<PlayOutcome, EngineError> {
        self.session.initial_probes();
        while !self.session.game.has_ended() {
            self.seed_knowledge()?;
            if !self.infer_moves() {
                break;
            }
        }
        Ok(self.session.finish())
    }

    /// Add one formula for every active hint that has not contributed yet.
    /// A hint is folded in at most once; its formula is never revisited even
    /// when the neighborhood shrinks later.
    fn seed_knowledge(&mut self) -> Result<(), EngineError> {
        for hint in self.session.active_hints() {
            if !self.contributed.insert(hint) {
                continue;
            }
            let unknown: Vec<CellId> = self
                .session
                .covered_neighbors(hint)
                .into_iter()
                .map(|n| self.ids.id(n))
                .collect();
            let value = self.session.hint_value(hint).unwrap_or(0) as i32;
            let marked = self.session.marked_neighbors(hint).len() as i32;
            let formula = self.encoder.exist_k_mines(value - marked, &unknown)?;
            if formula.is_informative() {
                log::debug!(
                    "hint {hint} contributes formula #{} ({} clauses)",
                    self.kb.len() + 1,
                    formula.clause_count()
                );
                self.kb.push(formula);
            }
        }
        Ok(())
    }

    fn infer_moves(&mut self) -> bool {
        let mut changed = false;
        for at in self.session.covered_cells() {
            if self.session.game.has_ended() {
                break;
            }
            let as_mine = Literal::mine(self.ids.id(at));
            if self.oracle.refutes(&self.kb, as_mine) {
                log::debug!("{at} proven safe, probing");
                self.session.probe(at);
                self.session.report_step();
                changed = true;
            } else if self.oracle.refutes(&self.kb, as_mine.negated()) {
                log::debug!("{at} proven mine, marking");
                self.session.mark_mine(at);
                self.session.report_step();
            }
        }
        changed
    }

    /// Number of hint formulas accumulated so far.
    pub fn knowledge_len(&self) -> usize {
        self.kb.len()
    }

    pub fn view_on(&self, at: Point) -> CellView {
        self.session.view_on(at)
    }

    pub fn view(&self) -> &GridView {
        &self.session.view
    }

    pub fn game(&self) -> &Game {
        &self.session.game
    }
}

/// Single-neighborhood heuristic: deduces only from one hint at a time
/// (all remaining neighbors mines, or none), no SAT back end. Kept as the
/// baseline the SAT agents are measured against.
#[derive(Debug)]
pub struct SinglePointAgent {
    session: Session,
}

impl SinglePointAgent {
    pub fn new(game: Game, verbose: bool) -> Self {
        SinglePointAgent {
            session: Session::new(game, verbose),
        }
    }

    pub fn play(&mut self) -> PlayOutcome {
        self.session.initial_probes();
        loop {
            let mut changed = false;
            for at in self.session.covered_cells() {
                if self.session.game.has_ended() {
                    break;
                }
                for hint in self.session.hint_neighbors(at) {
                    if self.deduce(hint, at) {
                        changed = true;
                        break;
                    }
                }
            }
            if !changed || self.session.game.has_ended() {
                break;
            }
        }
        self.session.finish()
    }

    /// Compare the hint's remaining mine count against its covered
    /// neighborhood: equal means every covered neighbor is a mine, zero
    /// means they are all safe.
    fn deduce(&mut self, hint: Point, target: Point) -> bool {
        let value = self.session.hint_value(hint).unwrap_or(0) as i32;
        let remaining = value - self.session.marked_neighbors(hint).len() as i32;
        let covered = self.session.covered_neighbors(hint).len() as i32;

        if remaining == covered {
            self.session.mark_mine(target);
            self.session.report_step();
            true
        } else if remaining == 0 {
            self.session.probe(target);
            self.session.report_step();
            true
        } else {
            false
        }
    }

    pub fn view_on(&self, at: Point) -> CellView {
        self.session.view_on(at)
    }

    pub fn view(&self) -> &GridView {
        &self.session.view
    }

    pub fn game(&self) -> &Game {
        &self.session.game
    }
}
