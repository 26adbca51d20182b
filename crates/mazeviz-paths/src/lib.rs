//! Step-wise path searches over a maze [`Grid`].
//!
//! Two algorithms are provided, both driven one visitation at a time
//! through the [`Search`] trait so a presentation layer can draw a frame
//! between steps:
//!
//! - **BFS** ([`Bfs`]): FIFO frontier, cells discovered on first enqueue.
//! - **Uniform-cost search** ([`Dijkstra`]): explicit tentative distances
//!   with unit edge weights.
//!
//! Both return a [`SearchOutcome`]: either the start-to-end path or
//! [`SearchOutcome::NoPath`]. On any grid they agree on the path length.
//!
//! [`Grid`]: mazeviz_core::Grid

mod bfs;
mod dijkstra;
mod step;

pub use bfs::Bfs;
pub use dijkstra::Dijkstra;
pub use step::{Search, SearchOutcome, Step, UNREACHABLE, Visit};

use mazeviz_core::{Grid, Pos};

/// Which algorithm a [`PathSearch`] runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchKind {
    Bfs,
    Dijkstra,
}

/// Either search, behind one type.
#[derive(Debug, Clone)]
pub enum PathSearch {
    Bfs(Bfs),
    Dijkstra(Dijkstra),
}

impl PathSearch {
    pub fn new(kind: SearchKind, grid: &Grid, start: Pos, end: Pos) -> Self {
        match kind {
            SearchKind::Bfs => Self::Bfs(Bfs::new(grid, start, end)),
            SearchKind::Dijkstra => Self::Dijkstra(Dijkstra::new(grid, start, end)),
        }
    }

    pub fn kind(&self) -> SearchKind {
        match self {
            Self::Bfs(_) => SearchKind::Bfs,
            Self::Dijkstra(_) => SearchKind::Dijkstra,
        }
    }

    /// Hop count recorded for `p` (BFS depth or uniform-cost distance).
    pub fn cost_at(&self, grid: &Grid, p: Pos) -> i32 {
        match self {
            Self::Bfs(s) => s.depth_at(grid, p),
            Self::Dijkstra(s) => s.distance_at(grid, p),
        }
    }
}

impl Search for PathSearch {
    fn step(&mut self, grid: &mut Grid) -> Step {
        match self {
            Self::Bfs(s) => s.step(grid),
            Self::Dijkstra(s) => s.step(grid),
        }
    }

    fn trace(&self) -> &[Visit] {
        match self {
            Self::Bfs(s) => s.trace(),
            Self::Dijkstra(s) => s.trace(),
        }
    }

    fn outcome(&self) -> Option<&SearchOutcome> {
        match self {
            Self::Bfs(s) => s.outcome(),
            Self::Dijkstra(s) => s.outcome(),
        }
    }
}

/// Run a breadth-first search to completion.
pub fn bfs(grid: &mut Grid, start: Pos, end: Pos) -> SearchOutcome {
    Bfs::new(grid, start, end).run_to_end(grid)
}

/// Run a uniform-cost search to completion.
pub fn shortest_path(grid: &mut Grid, start: Pos, end: Pos) -> SearchOutcome {
    Dijkstra::new(grid, start, end).run_to_end(grid)
}
