//! The true board and the per-session bookkeeping around it.
//!
//! The world is read-only once built; all observable game state (remaining
//! safe cells, remaining covered cells, terminal flags) lives in [`Game`].

use rand::prelude::*;

use crate::error::LayoutError;
use crate::grid::Point;

/// The true content of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldCell {
    /// Wall cell: never a mine, never counted, visible from the start.
    Blocked,
    Mine,
    /// Safe cell with its count of adjacent mines.
    Hint(u8),
}

/// The hidden ground truth the agent plays against.
#[derive(Debug, Clone)]
pub struct World {
    width: usize,
    height: usize,
    cells: Vec<WorldCell>,
}

impl World {
    /// Build a world from explicit mine and blocked coordinates; hint values
    /// are computed from mine adjacency.
    pub fn with_mines(width: usize, height: usize, mines: &[Point], blocked: &[Point]) -> Self {
        let mut cells = vec![WorldCell::Hint(0); width * height];
        for &b in blocked {
            cells[b.y * width + b.x] = WorldCell::Blocked;
        }
        for &m in mines {
            cells[m.y * width + m.x] = WorldCell::Mine;
        }
        for y in 0..height {
            for x in 0..width {
                let at = Point::new(x, y);
                if !matches!(cells[y * width + x], WorldCell::Hint(_)) {
                    continue;
                }
                let count = at
                    .neighbors(width, height)
                    .filter(|n| cells[n.y * width + n.x] == WorldCell::Mine)
                    .count();
                cells[y * width + x] = WorldCell::Hint(count as u8);
            }
        }
        World {
            width,
            height,
            cells,
        }
    }

    /// Parse a textual layout: `m` mine, `b` blocked, `.` safe, digits safe
    /// with a declared hint value. Spaces are ignored. Hint values are
    /// recomputed from mine adjacency and checked against declared digits.
    pub fn from_layout(text: &str) -> Result<Self, LayoutError> {
        let mut mines = Vec::new();
        let mut blocked = Vec::new();
        let mut declared = Vec::new();
        let mut width = None;

        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect())
            .filter(|row: &Vec<char>| !row.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(LayoutError::Empty);
        }

        for (y, row) in rows.iter().enumerate() {
            match width {
                None => width = Some(row.len()),
                Some(w) if w != row.len() => return Err(LayoutError::RaggedRow(y)),
                Some(_) => {}
            }
            for (x, &c) in row.iter().enumerate() {
                let at = Point::new(x, y);
                match c {
                    'm' => mines.push(at),
                    'b' => blocked.push(at),
                    '.' => {}
                    d if d.is_ascii_digit() => declared.push((at, d as u8 - b'0')),
                    other => return Err(LayoutError::UnknownCell(other)),
                }
            }
        }

        let world = World::with_mines(
            width.unwrap_or(0),
            rows.len(),
            &mines,
            &blocked,
        );
        for (at, value) in declared {
            if world.at(at) != WorldCell::Hint(value) {
                return Err(LayoutError::InconsistentHint(at));
            }
        }
        Ok(world)
    }

    /// A random world that keeps the top-left and center cells (and their
    /// whole neighborhoods) mine-free, so the engine's guaranteed-safe
    /// initial probes hold by construction. Empty boards and mine counts
    /// exceeding the space left outside the openings are rejected.
    pub fn random(
        width: usize,
        height: usize,
        mine_count: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::DegenerateSize { width, height });
        }
        let opening = [Point::new(0, 0), Point::new(width / 2, height / 2)];
        let candidates: Vec<Point> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Point::new(x, y)))
            .filter(|&p| {
                !opening.contains(&p)
                    && !opening
                        .iter()
                        .any(|o| o.neighbors(width, height).any(|n| n == p))
            })
            .collect();
        if mine_count > candidates.len() {
            return Err(LayoutError::TooManyMines {
                requested: mine_count,
                capacity: candidates.len(),
            });
        }
        let mines: Vec<Point> = candidates
            .choose_multiple(rng, mine_count)
            .copied()
            .collect();
        Ok(World::with_mines(width, height, &mines, &[]))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn at(&self, p: Point) -> WorldCell {
        self.cells[p.y * self.width + p.x]
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x < self.width && p.y < self.height
    }

    pub fn blocked_cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.points().filter(|&p| self.at(p) == WorldCell::Blocked)
    }

    fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point::new(x, y)))
    }
}

/// One playthrough over a world: probe side effects and terminal state.
///
/// A game is won when every safe cell has been probed, lost when a mine is
/// probed, and over when the player explicitly gives up.
#[derive(Debug)]
pub struct Game {
    world: World,
    safe_count: usize,
    covered_count: usize,
    hit_mine: bool,
    gave_up: bool,
}

impl Game {
    pub fn new(world: World) -> Self {
        let mut safe_count = 0;
        let mut covered_count = 0;
        for cell in &world.cells {
            match cell {
                WorldCell::Blocked => {}
                WorldCell::Mine => covered_count += 1,
                WorldCell::Hint(_) => {
                    covered_count += 1;
                    safe_count += 1;
                }
            }
        }
        Game {
            world,
            safe_count,
            covered_count,
            hit_mine: false,
            gave_up: false,
        }
    }

    /// Uncover a cell, updating the remaining safe/covered counters.
    /// Probing a blocked cell reveals the wall and changes nothing else.
    pub fn probe(&mut self, at: Point) -> WorldCell {
        let val = self.world.at(at);
        match val {
            WorldCell::Blocked => {}
            WorldCell::Mine => {
                self.covered_count -= 1;
                self.hit_mine = true;
            }
            WorldCell::Hint(_) => {
                self.covered_count -= 1;
                self.safe_count -= 1;
            }
        }
        val
    }

    /// Account for one covered cell being flagged as a mine.
    pub fn mark_mine(&mut self) {
        self.covered_count -= 1;
    }

    pub fn give_up(&mut self) {
        self.gave_up = true;
    }

    pub fn has_won(&self) -> bool {
        self.safe_count == 0
    }

    pub fn has_lost(&self) -> bool {
        self.hit_mine
    }

    pub fn gave_up(&self) -> bool {
        self.gave_up
    }

    pub fn has_ended(&self) -> bool {
        self.has_won() || self.has_lost() || self.gave_up
    }

    pub fn safe_count(&self) -> usize {
        self.safe_count
    }

    pub fn covered_count(&self) -> usize {
        self.covered_count
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}
