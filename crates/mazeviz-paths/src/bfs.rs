use std::collections::VecDeque;

use mazeviz_core::{CellKind, Grid, Pos};

use crate::step::{NO_PARENT, Search, SearchOutcome, Step, UNREACHABLE, Visit, walk_back};

/// Breadth-first search from `start` to `end`.
///
/// Cells are marked discovered when first enqueued, so the first time `end`
/// is dequeued its depth is the minimal hop count. Neighbours are expanded
/// in the grid's canonical direction order, which makes the visitation
/// order and the returned path fully deterministic.
#[derive(Debug, Clone)]
pub struct Bfs {
    goal: usize,
    depth: Vec<i32>,
    parents: Vec<usize>,
    queue: VecDeque<usize>,
    // Cell being expanded and its pending neighbours.
    expanding: Option<usize>,
    nbuf: Vec<Pos>,
    ncur: usize,
    trace: Vec<Visit>,
    outcome: Option<SearchOutcome>,
}

impl Bfs {
    /// Prepare a search on `grid`. Nothing is visited until the first
    /// [`step`](Search::step). An out-of-bounds `start` or `end` yields an
    /// immediate [`SearchOutcome::NoPath`].
    pub fn new(grid: &Grid, start: Pos, end: Pos) -> Self {
        let len = grid.len();
        let mut bfs = Self {
            goal: NO_PARENT,
            depth: vec![UNREACHABLE; len],
            parents: vec![NO_PARENT; len],
            queue: VecDeque::new(),
            expanding: None,
            nbuf: Vec::with_capacity(4),
            ncur: 0,
            trace: Vec::new(),
            outcome: None,
        };
        match (grid.index(start), grid.index(end)) {
            (Some(si), Some(gi)) => {
                bfs.goal = gi;
                bfs.depth[si] = 0;
                bfs.queue.push_back(si);
            }
            _ => bfs.outcome = Some(SearchOutcome::NoPath),
        }
        bfs
    }

    /// Hop count from the start at which `p` was discovered, or
    /// [`UNREACHABLE`] if it has not been discovered (yet).
    pub fn depth_at(&self, grid: &Grid, p: Pos) -> i32 {
        grid.index(p)
            .and_then(|i| self.depth.get(i).copied())
            .unwrap_or(UNREACHABLE)
    }

    fn finish(&mut self, outcome: SearchOutcome) -> Step {
        match &outcome {
            SearchOutcome::Found(path) => log::debug!(
                "bfs: found path of {} cells after {} visits",
                path.len(),
                self.trace.len()
            ),
            SearchOutcome::NoPath => {
                log::debug!("bfs: no path after {} visits", self.trace.len())
            }
        }
        self.outcome = Some(outcome.clone());
        Step::Finished(outcome)
    }
}

impl Search for Bfs {
    fn step(&mut self, grid: &mut Grid) -> Step {
        if let Some(outcome) = &self.outcome {
            return Step::Finished(outcome.clone());
        }
        if grid.len() != self.depth.len() {
            // The grid was swapped for one of another size mid-search.
            return self.finish(SearchOutcome::NoPath);
        }

        loop {
            if let Some(ci) = self.expanding {
                while self.ncur < self.nbuf.len() {
                    let np = self.nbuf[self.ncur];
                    self.ncur += 1;
                    let Some(ni) = grid.index(np) else {
                        continue;
                    };
                    if self.depth[ni] != UNREACHABLE {
                        continue;
                    }
                    let nd = self.depth[ci] + 1;
                    self.depth[ni] = nd;
                    self.parents[ni] = ci;
                    self.queue.push_back(ni);
                    grid.mark(np, CellKind::Visited);

                    let visit = Visit {
                        cell: np,
                        parent: grid.pos(ci),
                        cost: nd,
                    };
                    self.trace.push(visit);
                    return Step::Visited(visit);
                }

                let cp = grid.pos(ci);
                if grid.at(cp) == Some(CellKind::Frontier) {
                    grid.mark(cp, CellKind::Visited);
                }
                self.expanding = None;
            }

            let Some(ci) = self.queue.pop_front() else {
                return self.finish(SearchOutcome::NoPath);
            };
            if ci == self.goal {
                let path = walk_back(grid, ci, |i| self.parents[i]);
                return self.finish(SearchOutcome::Found(path));
            }

            let cp = grid.pos(ci);
            grid.mark(cp, CellKind::Frontier);
            self.nbuf.clear();
            grid.neighbors_into(cp, &mut self.nbuf);
            self.ncur = 0;
            self.expanding = Some(ci);
        }
    }

    fn trace(&self) -> &[Visit] {
        &self.trace
    }

    fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }
}
