//! The step-wise search protocol shared by every algorithm in this crate.

use mazeviz_core::{Grid, Pos};

/// Sentinel value meaning "unreachable" in depth / distance queries.
pub const UNREACHABLE: i32 = i32::MAX;

/// Sentinel parent index of the search root.
pub(crate) const NO_PARENT: usize = usize::MAX;

/// One entry of the visitation trace: `cell` was reached from `parent` at
/// hop count `cost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Visit {
    pub cell: Pos,
    pub parent: Pos,
    pub cost: i32,
}

/// Final result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchOutcome {
    /// Cells from start to end, both included. Never empty.
    Found(Vec<Pos>),
    /// The end cannot be reached from the start.
    NoPath,
}

impl SearchOutcome {
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The path, if one was found.
    pub fn path(&self) -> Option<&[Pos]> {
        match self {
            Self::Found(p) => Some(p),
            Self::NoPath => None,
        }
    }

    pub fn into_path(self) -> Option<Vec<Pos>> {
        match self {
            Self::Found(p) => Some(p),
            Self::NoPath => None,
        }
    }
}

/// What a single call to [`Search::step`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A cell was discovered (BFS) or relaxed (uniform-cost search). The
    /// grid has been updated and the caller may render a frame.
    Visited(Visit),
    /// The search is over. Further calls keep returning the same outcome.
    Finished(SearchOutcome),
}

/// A search that advances one visitation at a time.
///
/// A search borrows the grid only for the duration of a step, so the caller
/// is free to read (and draw) the grid between steps, or to drop the search
/// half-way. Abandoning a search leaves only Visited / Frontier markers
/// behind, which [`Grid::clear_transient_markers`] removes.
pub trait Search {
    /// Advance by exactly one visitation, or finish.
    fn step(&mut self, grid: &mut Grid) -> Step;

    /// Every visitation produced so far, in order.
    fn trace(&self) -> &[Visit];

    /// The outcome, once the search has finished.
    fn outcome(&self) -> Option<&SearchOutcome>;

    #[inline]
    fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }

    /// Step until finished, calling `on_visit` after every visitation with
    /// the visit and the updated grid.
    fn run<F>(&mut self, grid: &mut Grid, mut on_visit: F) -> SearchOutcome
    where
        F: FnMut(Visit, &Grid),
        Self: Sized,
    {
        loop {
            match self.step(grid) {
                Step::Visited(v) => on_visit(v, grid),
                Step::Finished(outcome) => return outcome,
            }
        }
    }

    /// Step until finished without observing intermediate visits.
    fn run_to_end(&mut self, grid: &mut Grid) -> SearchOutcome
    where
        Self: Sized,
    {
        self.run(grid, |_, _| {})
    }
}

/// Follow parent links from `goal` back to the root and return the path in
/// root-to-goal order.
pub(crate) fn walk_back(grid: &Grid, goal: usize, parent: impl Fn(usize) -> usize) -> Vec<Pos> {
    let mut path = Vec::new();
    let mut ci = goal;
    while ci != NO_PARENT {
        path.push(grid.pos(ci));
        ci = parent(ci);
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_back_reverses_parent_chain() {
        let grid = Grid::new(1, 4);
        // 3 -> 2 -> 0 (root)
        let parents = [NO_PARENT, NO_PARENT, 0, 2];
        let path = walk_back(&grid, 3, |i| parents[i]);
        assert_eq!(path, vec![Pos::new(0, 0), Pos::new(0, 2), Pos::new(0, 3)]);
    }

    #[test]
    fn outcome_accessors() {
        let found = SearchOutcome::Found(vec![Pos::ORIGIN]);
        assert!(found.is_found());
        assert_eq!(found.path(), Some(&[Pos::ORIGIN][..]));
        assert_eq!(SearchOutcome::NoPath.into_path(), None);
    }
}
