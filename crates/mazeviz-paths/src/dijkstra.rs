use std::collections::BinaryHeap;

use mazeviz_core::{CellKind, Grid, Pos};

use crate::step::{NO_PARENT, Search, SearchOutcome, Step, UNREACHABLE, Visit, walk_back};

// ---------------------------------------------------------------------------
// Internal node bookkeeping
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct Node {
    dist: i32,
    parent: usize,
    settled: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            dist: UNREACHABLE,
            parent: NO_PARENT,
            settled: false,
        }
    }
}

/// Reference into the node array, ordered for use in `BinaryHeap`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct NodeRef {
    idx: usize,
    dist: i32,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed so the max-heap pops the smallest distance first, and
        // among equal distances the smallest index (grid scan order).
        other
            .dist
            .cmp(&self.dist)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Dijkstra
// ---------------------------------------------------------------------------

/// Uniform-cost ("Dijkstra") search from `start` to `end`.
///
/// Every edge weighs exactly 1, so the resulting path length equals the BFS
/// one; the search nevertheless keeps explicit tentative distances and
/// relaxes them. The next cell to settle is the unsettled cell with the
/// smallest finite distance, ties going to the cell that comes first in
/// row-major order.
#[derive(Debug, Clone)]
pub struct Dijkstra {
    goal: usize,
    nodes: Vec<Node>,
    open: BinaryHeap<NodeRef>,
    expanding: Option<usize>,
    nbuf: Vec<Pos>,
    ncur: usize,
    trace: Vec<Visit>,
    outcome: Option<SearchOutcome>,
}

/// Edge weight between two adjacent cells.
const STEP_COST: i32 = 1;

impl Dijkstra {
    /// Prepare a search on `grid`: distance 0 at `start`, infinity
    /// elsewhere. An out-of-bounds `start` or `end` yields an immediate
    /// [`SearchOutcome::NoPath`].
    pub fn new(grid: &Grid, start: Pos, end: Pos) -> Self {
        let mut search = Self {
            goal: NO_PARENT,
            nodes: vec![Node::default(); grid.len()],
            open: BinaryHeap::new(),
            expanding: None,
            nbuf: Vec::with_capacity(4),
            ncur: 0,
            trace: Vec::new(),
            outcome: None,
        };
        match (grid.index(start), grid.index(end)) {
            (Some(si), Some(gi)) => {
                search.goal = gi;
                search.nodes[si].dist = 0;
                search.open.push(NodeRef { idx: si, dist: 0 });
            }
            _ => search.outcome = Some(SearchOutcome::NoPath),
        }
        search
    }

    /// Current tentative (or settled) distance of `p` from the start, or
    /// [`UNREACHABLE`].
    pub fn distance_at(&self, grid: &Grid, p: Pos) -> i32 {
        grid.index(p)
            .and_then(|i| self.nodes.get(i))
            .map_or(UNREACHABLE, |n| n.dist)
    }

    /// Whether `p` has been settled, i.e. its distance is final.
    pub fn is_settled(&self, grid: &Grid, p: Pos) -> bool {
        grid.index(p)
            .and_then(|i| self.nodes.get(i))
            .is_some_and(|n| n.settled)
    }

    /// Pop the closest unsettled cell, skipping stale heap entries.
    fn select(&mut self) -> Option<usize> {
        while let Some(NodeRef { idx, dist }) = self.open.pop() {
            let n = &self.nodes[idx];
            if n.settled || n.dist != dist {
                continue;
            }
            return Some(idx);
        }
        None
    }

    fn finish(&mut self, outcome: SearchOutcome) -> Step {
        match &outcome {
            SearchOutcome::Found(path) => log::debug!(
                "dijkstra: found path of {} cells after {} relaxations",
                path.len(),
                self.trace.len()
            ),
            SearchOutcome::NoPath => {
                log::debug!("dijkstra: no path after {} relaxations", self.trace.len())
            }
        }
        self.outcome = Some(outcome.clone());
        Step::Finished(outcome)
    }
}

impl Search for Dijkstra {
    fn step(&mut self, grid: &mut Grid) -> Step {
        if let Some(outcome) = &self.outcome {
            return Step::Finished(outcome.clone());
        }
        if grid.len() != self.nodes.len() {
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
                    let candidate = self.nodes[ci].dist + STEP_COST;
                    let n = &mut self.nodes[ni];
                    if candidate >= n.dist {
                        continue;
                    }
                    n.dist = candidate;
                    n.parent = ci;
                    self.open.push(NodeRef {
                        idx: ni,
                        dist: candidate,
                    });
                    grid.mark(np, CellKind::Visited);

                    let visit = Visit {
                        cell: np,
                        parent: grid.pos(ci),
                        cost: candidate,
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

            let Some(ci) = self.select() else {
                return self.finish(SearchOutcome::NoPath);
            };
            self.nodes[ci].settled = true;
            if ci == self.goal {
                let path = walk_back(grid, ci, |i| self.nodes[i].parent);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn search(grid: &mut Grid) -> (Dijkstra, SearchOutcome) {
        let (s, e) = (grid.start().unwrap(), grid.end().unwrap());
        let mut d = Dijkstra::new(grid, s, e);
        let outcome = d.run_to_end(grid);
        (d, outcome)
    }

    #[test]
    fn open_grid_path_length() {
        let mut g = Grid::new(5, 5);
        g.place(CellKind::Start, Pos::new(0, 0));
        g.place(CellKind::End, Pos::new(4, 4));
        let (_, outcome) = search(&mut g);
        assert_eq!(outcome.path().map(<[Pos]>::len), Some(9));
    }

    #[test]
    fn detour_around_wall() {
        // Start and End are two apart with a wall between them; the only
        // way round is through the bottom row.
        let mut g = Grid::from_ascii(
            "
            S#E
            ...
            ",
        )
        .unwrap();
        let (d, outcome) = search(&mut g);
        let path = outcome.into_path().unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(d.distance_at(&g, Pos::new(0, 2)), 4);
    }

    #[test]
    fn enclosed_end_has_no_path() {
        let mut g = Grid::from_ascii(
            "
            S.#.
            ..#E
            ..##
            ",
        )
        .unwrap();
        let (d, outcome) = search(&mut g);
        assert_eq!(outcome, SearchOutcome::NoPath);
        assert_eq!(d.distance_at(&g, Pos::new(1, 3)), UNREACHABLE);
        assert!(d.is_settled(&g, Pos::new(2, 1)));
    }

    #[test]
    fn start_equals_end_is_single_cell() {
        let mut g = Grid::new(2, 2);
        let p = Pos::new(1, 0);
        let mut d = Dijkstra::new(&g, p, p);
        assert_eq!(d.run_to_end(&mut g), SearchOutcome::Found(vec![p]));
    }

    #[test]
    fn distances_are_hop_counts() {
        let mut g = Grid::from_ascii("S...\n.#..\n...E").unwrap();
        let (d, _) = search(&mut g);
        assert_eq!(d.distance_at(&g, Pos::new(0, 0)), 0);
        assert_eq!(d.distance_at(&g, Pos::new(0, 3)), 3);
        assert_eq!(d.distance_at(&g, Pos::new(2, 3)), 5);
        assert_eq!(d.distance_at(&g, Pos::new(1, 1)), UNREACHABLE);
    }

    #[test]
    fn every_relaxation_is_one_step() {
        let mut g = Grid::from_ascii("S..\n...\n..E").unwrap();
        let mut d = Dijkstra::new(&g, Pos::new(0, 0), Pos::new(2, 2));
        let Step::Visited(first) = d.step(&mut g) else {
            panic!("expected a visit");
        };
        assert_eq!(first.cell, Pos::new(1, 0));
        assert_eq!(first.parent, Pos::new(0, 0));
        assert_eq!(first.cost, 1);
        assert_eq!(g.at(Pos::new(1, 0)), Some(CellKind::Visited));
        assert_eq!(g.at(Pos::new(0, 1)), Some(CellKind::Empty));
    }

    #[test]
    fn ties_break_in_scan_order() {
        let mut g = Grid::from_ascii("S..\n...\n..E").unwrap();
        let (_, outcome) = search(&mut g);
        // (0,1) precedes (1,0) in scan order, so the top row settles first
        // and claims the cells along the right-hand column.
        assert_eq!(
            outcome.into_path().unwrap(),
            vec![
                Pos::new(0, 0),
                Pos::new(0, 1),
                Pos::new(0, 2),
                Pos::new(1, 2),
                Pos::new(2, 2),
            ]
        );
    }

    #[test]
    fn abandoning_mid_search_is_restorable() {
        let mut g = Grid::from_ascii("S.#.\n....\n.#.E").unwrap();
        let before = g.clone();
        let mut d = Dijkstra::new(&g, Pos::new(0, 0), Pos::new(2, 3));
        for _ in 0..4 {
            assert!(matches!(d.step(&mut g), Step::Visited(_)));
        }
        assert!(g.count(CellKind::Visited) + g.count(CellKind::Frontier) > 0);
        drop(d);
        g.clear_transient_markers();
        assert_eq!(g, before);
    }

    #[test]
    fn noderef_orders_by_distance_then_index() {
        let mut heap = BinaryHeap::new();
        heap.push(NodeRef { idx: 5, dist: 2 });
        heap.push(NodeRef { idx: 9, dist: 1 });
        heap.push(NodeRef { idx: 3, dist: 1 });
        assert_eq!(heap.pop(), Some(NodeRef { idx: 3, dist: 1 }));
        assert_eq!(heap.pop(), Some(NodeRef { idx: 9, dist: 1 }));
        assert_eq!(heap.pop(), Some(NodeRef { idx: 5, dist: 2 }));
    }
}
