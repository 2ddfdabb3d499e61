use std::fmt;

/// A 2D coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Point { x, y }
    }

    /// All in-bounds neighbors on 8 sides, left to right on each row,
    /// top row to bottom row. Scan order is part of the engine's observable
    /// behavior, so it is fixed here and nowhere else.
    pub fn neighbors(self, width: usize, height: usize) -> impl Iterator<Item = Point> {
        (-1..=1).flat_map(move |dy: isize| {
            (-1..=1).filter_map(move |dx: isize| {
                if dx == 0 && dy == 0 {
                    return None;
                }
                let nx = self.x as isize + dx;
                let ny = self.y as isize + dy;
                if nx >= 0 && nx < width as isize && ny >= 0 && ny < height as isize {
                    Some(Point {
                        x: nx as usize,
                        y: ny as usize,
                    })
                } else {
                    None
                }
            })
        })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Stable positive identifier of one cell, used as a propositional variable.
///
/// Identifiers are allocated row-major by [`CellIds`], so the mapping from
/// coordinates is bijective; two distinct cells can never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u32);

impl CellId {
    /// The raw positive identifier.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based index for dense variable tables (solver variables).
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

/// Row-major allocator of [`CellId`]s for a board of a fixed width.
#[derive(Debug, Clone, Copy)]
pub struct CellIds {
    width: usize,
}

impl CellIds {
    pub fn new(width: usize) -> Self {
        CellIds { width }
    }

    pub fn id(&self, at: Point) -> CellId {
        CellId((at.y * self.width + at.x + 1) as u32)
    }
}

/// What the player currently sees on one cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    /// Not yet probed; the cell the engine reasons about.
    Unknown,
    /// Probed safe cell showing the number of adjacent mines.
    Hint(u8),
    /// Deduced to be a mine and flagged.
    Marked,
    /// Wall cell, visible from the start.
    Blocked,
    /// A probed mine. The game is lost once this appears.
    Exploded,
}

impl fmt::Display for CellView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellView::Unknown => write!(f, "?"),
            CellView::Hint(n) => write!(f, "{n}"),
            CellView::Marked => write!(f, "*"),
            CellView::Blocked => write!(f, "b"),
            CellView::Exploded => write!(f, "-"),
        }
    }
}

/// The player's mutable overlay of the true board.
///
/// Owned exclusively by one agent; the world itself is never written through
/// this type.
#[derive(Debug, Clone)]
pub struct GridView {
    width: usize,
    height: usize,
    cells: Vec<CellView>,
}

impl GridView {
    /// A fully covered view, with blocked cells visible from the start.
    pub fn covered(width: usize, height: usize, blocked: impl Iterator<Item = Point>) -> Self {
        let mut view = GridView {
            width,
            height,
            cells: vec![CellView::Unknown; width * height],
        };
        for at in blocked {
            view.set(at, CellView::Blocked);
        }
        view
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn on(&self, at: Point) -> CellView {
        self.cells[at.y * self.width + at.x]
    }

    pub fn set(&mut self, at: Point, to: CellView) {
        self.cells[at.y * self.width + at.x] = to;
    }

    pub fn neighbors(&self, at: Point) -> impl Iterator<Item = Point> {
        at.neighbors(self.width, self.height)
    }
}

impl fmt::Display for GridView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        write!(f, "    ")?;
        for x in 0..self.width {
            write!(f, "{x} ")?;
        }
        writeln!(f)?;
        write!(f, "    ")?;
        for _ in 0..self.width {
            write!(f, "- ")?;
        }
        writeln!(f)?;
        for y in 0..self.height {
            write!(f, " {y}| ")?;
            for x in 0..self.width {
                write!(f, "{} ", self.on(Point { x, y }))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_order_is_row_major() {
        // Fixed order matters: the encoders recurse over neighbor arrays and
        // tests downstream assert on literal order.
        let center: Vec<Point> = Point::new(1, 1).neighbors(3, 3).collect();
        assert_eq!(
            center,
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(0, 1),
                Point::new(2, 1),
                Point::new(0, 2),
                Point::new(1, 2),
                Point::new(2, 2),
            ]
        );
    }

    #[test]
    fn neighbors_respect_bounds() {
        assert_eq!(Point::new(0, 0).neighbors(3, 3).count(), 3);
        assert_eq!(Point::new(1, 0).neighbors(3, 3).count(), 5);
        assert_eq!(Point::new(1, 1).neighbors(3, 3).count(), 8);
    }

    #[test]
    fn cell_ids_are_bijective_and_positive() {
        let ids = CellIds::new(4);
        let mut seen = std::collections::HashSet::new();
        for y in 0..5 {
            for x in 0..4 {
                let id = ids.id(Point::new(x, y));
                assert!(id.get() > 0);
                assert!(seen.insert(id), "duplicate id for ({x},{y})");
            }
        }
        assert_eq!(ids.id(Point::new(0, 0)).get(), 1);
        assert_eq!(ids.id(Point::new(3, 4)).get(), 20);
        assert_eq!(ids.id(Point::new(2, 1)).index(), 6);
    }
}
