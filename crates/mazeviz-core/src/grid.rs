//! The [`Grid`] type: a fixed-size 2D matrix of [`CellKind`]s.
//!
//! The grid owns the cell states and caches where the single Start and the
//! single End currently are. Every mutating method keeps the cache in step
//! with the cells: `start()` is `Some(p)` exactly when cell `p` is Start,
//! and likewise for End.

use std::fmt;

use rand::{Rng, RngExt};

use crate::cell::CellKind;
use crate::error::{GridParseError, PlacementError};
use crate::geom::{Direction, Pos};

/// A `rows × columns` grid of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<CellKind>,
    rows: i32,
    columns: i32,
    start: Option<Pos>,
    end: Option<Pos>,
}

impl Grid {
    /// Create an all-Empty grid. Negative dimensions are clamped to zero.
    pub fn new(rows: i32, columns: i32) -> Self {
        let rows = rows.max(0);
        let columns = columns.max(0);
        Self {
            cells: vec![CellKind::Empty; (rows as usize) * (columns as usize)],
            rows,
            columns,
            start: None,
            end: None,
        }
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> i32 {
        self.columns
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `p` lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.row >= 0 && p.col >= 0 && p.row < self.rows && p.col < self.columns
    }

    /// Flat row-major index of `p`, or `None` if out of bounds.
    #[inline]
    pub fn index(&self, p: Pos) -> Option<usize> {
        if self.contains(p) {
            Some((p.row as usize) * (self.columns as usize) + p.col as usize)
        } else {
            None
        }
    }

    /// Inverse of [`index`](Self::index). `idx` must be below `len()`.
    #[inline]
    pub fn pos(&self, idx: usize) -> Pos {
        let cols = self.columns as usize;
        Pos::new((idx / cols) as i32, (idx % cols) as i32)
    }

    /// The cell at `p`, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, p: Pos) -> Option<CellKind> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Cached Start position.
    #[inline]
    pub fn start(&self) -> Option<Pos> {
        self.start
    }

    /// Cached End position.
    #[inline]
    pub fn end(&self) -> Option<Pos> {
        self.end
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    /// Place a Start, End or Wall at `p`.
    ///
    /// The target must be in bounds and not already hold Start, End, Wall or
    /// the solve walker's token. Start and End are unique: placing one while
    /// another exists elsewhere fails. Search markers do not block placement
    /// and are overwritten.
    pub fn try_place(&mut self, kind: CellKind, p: Pos) -> Result<(), PlacementError> {
        if !kind.is_placeable() {
            return Err(PlacementError::NotPlaceable(kind));
        }
        let Some(i) = self.index(p) else {
            return Err(PlacementError::OutOfBounds(p));
        };
        let current = self.cells[i];
        if current.is_placeable() || current == CellKind::UserToken {
            return Err(PlacementError::Occupied { pos: p, by: current });
        }
        match kind {
            CellKind::Start => {
                if let Some(existing) = self.start {
                    return Err(PlacementError::DuplicateStart(existing));
                }
                self.start = Some(p);
            }
            CellKind::End => {
                if let Some(existing) = self.end {
                    return Err(PlacementError::DuplicateEnd(existing));
                }
                self.end = Some(p);
            }
            _ => {}
        }
        self.cells[i] = kind;
        Ok(())
    }

    /// Like [`try_place`](Self::try_place) but silently ignores invalid
    /// placements. Returns whether the cell changed.
    pub fn place(&mut self, kind: CellKind, p: Pos) -> bool {
        match self.try_place(kind, p) {
            Ok(()) => true,
            Err(e) => {
                log::trace!("placement ignored: {e}");
                false
            }
        }
    }

    /// Turn the cell at `p` back to Empty, whatever it held. Returns the
    /// previous kind, or `None` if `p` is out of bounds.
    pub fn erase(&mut self, p: Pos) -> Option<CellKind> {
        let i = self.index(p)?;
        let prev = self.cells[i];
        self.cells[i] = CellKind::Empty;
        self.forget(p, prev);
        Some(prev)
    }

    /// Alias of [`erase`](Self::erase) used by maze carving.
    #[inline]
    pub fn carve(&mut self, p: Pos) -> bool {
        self.erase(p).is_some()
    }

    /// Overwrite every cell with Wall, dropping Start and End.
    pub fn fill_walls(&mut self) {
        self.cells.fill(CellKind::Wall);
        self.start = None;
        self.end = None;
    }

    fn forget(&mut self, p: Pos, prev: CellKind) {
        match prev {
            CellKind::Start if self.start == Some(p) => self.start = None,
            CellKind::End if self.end == Some(p) => self.end = None,
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Transient markers
    // -----------------------------------------------------------------------

    /// Write a transient marker at `p`.
    ///
    /// Only Empty cells and cells holding another marker are overwritten;
    /// Start, End and Wall are left alone. Returns whether the cell changed.
    pub fn mark(&mut self, p: Pos, marker: CellKind) -> bool {
        if !marker.is_transient() {
            return false;
        }
        let Some(i) = self.index(p) else {
            return false;
        };
        let current = self.cells[i];
        if current == CellKind::Empty || current.is_transient() {
            self.cells[i] = marker;
            current != marker
        } else {
            false
        }
    }

    /// Remove a transient marker at `p`, leaving any other kind untouched.
    pub fn unmark(&mut self, p: Pos) -> bool {
        match self.index(p) {
            Some(i) if self.cells[i].is_transient() => {
                self.cells[i] = CellKind::Empty;
                true
            }
            _ => false,
        }
    }

    /// Reset every Visited / Frontier / UserToken cell to Empty. Returns the
    /// number of cells cleared.
    pub fn clear_transient_markers(&mut self) -> usize {
        let mut n = 0;
        for c in self.cells.iter_mut() {
            if c.is_transient() {
                *c = CellKind::Empty;
                n += 1;
            }
        }
        n
    }

    /// Set every cell to Empty and clear the cached Start / End.
    pub fn reset(&mut self) {
        self.cells.fill(CellKind::Empty);
        self.start = None;
        self.end = None;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Orthogonal in-bounds non-Wall neighbours of `p`, in canonical
    /// direction order (up, down, left, right).
    pub fn neighbors(&self, p: Pos) -> Vec<Pos> {
        let mut buf = Vec::with_capacity(4);
        self.neighbors_into(p, &mut buf);
        buf
    }

    /// Append the neighbours of `p` into `buf`. The caller clears `buf`.
    pub fn neighbors_into(&self, p: Pos, buf: &mut Vec<Pos>) {
        if !self.contains(p) {
            return;
        }
        for d in Direction::ALL {
            let n = p.step(d);
            if self.at(n).is_some_and(CellKind::is_passable) {
                buf.push(n);
            }
        }
    }

    /// Turn each Empty or search-marked cell into a Wall with independent
    /// probability `probability`. Start, End, existing walls and the user
    /// token are never touched. Returns the number of walls added.
    pub fn randomize_walls(&mut self, probability: f64, rng: &mut impl Rng) -> usize {
        let mut added = 0;
        for c in self.cells.iter_mut() {
            if !matches!(c, CellKind::Empty | CellKind::Visited | CellKind::Frontier) {
                continue;
            }
            let r: f64 = rng.random();
            if r < probability {
                *c = CellKind::Wall;
                added += 1;
            }
        }
        added
    }

    /// Count cells of the given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Row-major iterator over `(Pos, CellKind)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, CellKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (self.pos(i), c))
    }

    // -----------------------------------------------------------------------
    // ASCII format
    // -----------------------------------------------------------------------

    /// Parse a grid from ASCII art, one line per row.
    ///
    /// Runes are those of [`CellKind::rune`]. Surrounding blank lines and
    /// leading/trailing whitespace on each line are ignored.
    pub fn from_ascii(s: &str) -> Result<Self, GridParseError> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let rows = lines.len() as i32;
        let columns = lines.first().map_or(0, |l| l.chars().count()) as i32;
        let mut grid = Grid::new(rows, columns);

        for (r, line) in lines.iter().enumerate() {
            if line.chars().count() as i32 != columns {
                return Err(GridParseError::InconsistentSize {
                    row: r as i32,
                    expected: columns,
                    found: line.chars().count() as i32,
                });
            }
            for (c, ch) in line.chars().enumerate() {
                let p = Pos::new(r as i32, c as i32);
                let kind =
                    CellKind::from_rune(ch).ok_or(GridParseError::InvalidRune { ch, pos: p })?;
                match kind {
                    CellKind::Start => {
                        if let Some(first) = grid.start {
                            return Err(GridParseError::DuplicateStart { first, second: p });
                        }
                        grid.start = Some(p);
                    }
                    CellKind::End => {
                        if let Some(first) = grid.end {
                            return Err(GridParseError::DuplicateEnd { first, second: p });
                        }
                        grid.end = Some(p);
                    }
                    _ => {}
                }
                let i = (r * columns as usize) + c;
                grid.cells[i] = kind;
            }
        }
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = self.columns.max(1) as usize;
        for (i, row) in self.cells.chunks(cols).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for c in row {
                write!(f, "{}", c.rune())?;
            }
        }
        Ok(())
    }
}
