//! Recursive-backtracking maze generator.
//!
//! The grid is treated as a lattice of "rooms" at even `(row, column)`
//! coordinates separated by one-cell walls. Starting from the origin the
//! generator walks to a random unvisited room two cells away, knocking down
//! the wall in between, and backtracks when it is stuck. The result is a
//! perfect maze: every open cell is reachable from the origin along exactly
//! one path.
//!
//! The walk keeps its own stack instead of recursing, so grid size is bounded
//! only by memory.

use mazeviz_core::{CellKind, Direction, Grid, Pos};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// One suspended carving call: the room, its shuffled directions and how
/// many of them have been tried.
struct Frame {
    pos: Pos,
    dirs: [Direction; 4],
    next: usize,
}

/// Maze generator driven by an injectable random source.
pub struct MazeGen<R: Rng> {
    pub rng: R,
}

impl MazeGen<StdRng> {
    /// Deterministic generator, mostly useful for tests and replays.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MazeGen<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn shuffled(&mut self) -> [Direction; 4] {
        let mut dirs = Direction::ALL;
        dirs.shuffle(&mut self.rng);
        dirs
    }

    /// Overwrite `grid` with a freshly carved maze.
    ///
    /// Every cell becomes Wall first, so any Start / End placement is lost
    /// and must be redone by the caller. Cells off the two-step lattice that
    /// no carve reaches stay Wall. A grid too small to hold the origin is
    /// left fully walled.
    ///
    /// Returns the number of cells carved open.
    pub fn generate(&mut self, grid: &mut Grid) -> usize {
        grid.fill_walls();
        if !grid.contains(Pos::ORIGIN) {
            return 0;
        }

        grid.carve(Pos::ORIGIN);
        let mut carved = 1;
        let mut max_depth = 1;
        let mut stack = vec![Frame {
            pos: Pos::ORIGIN,
            dirs: self.shuffled(),
            next: 0,
        }];

        while let Some(top) = stack.last_mut() {
            if top.next == top.dirs.len() {
                stack.pop();
                continue;
            }
            let dir = top.dirs[top.next];
            top.next += 1;

            let (dr, dc) = dir.delta();
            let here = top.pos;
            let target = here.shift(2 * dr, 2 * dc);
            if grid.at(target) != Some(CellKind::Wall) {
                continue;
            }

            grid.carve(here.step(dir));
            grid.carve(target);
            carved += 2;

            let dirs = self.shuffled();
            stack.push(Frame {
                pos: target,
                dirs,
                next: 0,
            });
            max_depth = max_depth.max(stack.len());
        }

        log::debug!(
            "maze: carved {carved} of {} cells on a {}x{} grid, max depth {max_depth}",
            grid.len(),
            grid.rows(),
            grid.columns()
        );
        carved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Flood fill from the origin; returns how many open cells were reached
    /// and how many open cells were not.
    fn flood(grid: &Grid) -> (usize, usize) {
        let mut seen = vec![false; grid.len()];
        let mut queue = VecDeque::from([Pos::ORIGIN]);
        seen[0] = true;
        let (mut reached, mut unreached) = (0, 0);
        while let Some(p) = queue.pop_front() {
            reached += 1;
            for n in grid.neighbors(p) {
                let i = grid.index(n).unwrap();
                if !seen[i] {
                    seen[i] = true;
                    queue.push_back(n);
                }
            }
        }
        for (p, c) in grid.iter() {
            if c == CellKind::Empty && !seen[grid.index(p).unwrap()] {
                unreached += 1;
            }
        }
        (reached, unreached)
    }

    /// Undirected edges between orthogonally adjacent open cells.
    fn open_edges(grid: &Grid) -> usize {
        grid.iter()
            .filter(|&(_, c)| c == CellKind::Empty)
            .map(|(p, _)| {
                [Direction::Down, Direction::Right]
                    .into_iter()
                    .filter(|&d| grid.at(p.step(d)) == Some(CellKind::Empty))
                    .count()
            })
            .sum()
    }

    #[test]
    fn maze_is_connected_and_acyclic() {
        for seed in 0..8 {
            let mut grid = Grid::new(21, 31);
            let carved = MazeGen::from_seed(seed).generate(&mut grid);
            let open = grid.count(CellKind::Empty);
            assert_eq!(carved, open);

            let (reached, unreached) = flood(&grid);
            assert_eq!(reached, open, "seed {seed}");
            assert_eq!(unreached, 0, "seed {seed}");
            // A spanning tree has exactly one edge fewer than vertices.
            assert_eq!(open_edges(&grid), open - 1, "seed {seed}");
        }
    }

    #[test]
    fn every_lattice_room_is_carved() {
        let mut grid = Grid::new(11, 11);
        MazeGen::from_seed(3).generate(&mut grid);
        for r in (0..11).step_by(2) {
            for c in (0..11).step_by(2) {
                assert_eq!(grid.at(Pos::new(r, c)), Some(CellKind::Empty));
            }
        }
        // Odd/odd cells are never carved.
        assert_eq!(grid.at(Pos::new(1, 1)), Some(CellKind::Wall));
    }

    #[test]
    fn generation_drops_endpoints() {
        let mut grid = Grid::new(5, 5);
        grid.place(CellKind::Start, Pos::new(0, 0));
        grid.place(CellKind::End, Pos::new(4, 4));
        MazeGen::from_seed(1).generate(&mut grid);
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), None);
        assert_eq!(grid.count(CellKind::Start), 0);
    }

    #[test]
    fn same_seed_same_maze() {
        let mut a = Grid::new(15, 15);
        let mut b = Grid::new(15, 15);
        MazeGen::from_seed(42).generate(&mut a);
        MazeGen::from_seed(42).generate(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_grids_do_not_crash() {
        let mut g = Grid::new(0, 0);
        assert_eq!(MazeGen::from_seed(0).generate(&mut g), 0);

        let mut g = Grid::new(1, 1);
        assert_eq!(MazeGen::from_seed(0).generate(&mut g), 1);
        assert_eq!(g.to_string(), ".");

        let mut g = Grid::new(2, 2);
        MazeGen::from_seed(0).generate(&mut g);
        assert_eq!(g.to_string(), ".#\n##");

        let mut g = Grid::new(1, 5);
        MazeGen::from_seed(0).generate(&mut g);
        assert_eq!(g.to_string(), ".....");
    }

    #[test]
    fn even_dimensions_leave_last_row_and_column_walled() {
        let mut g = Grid::new(6, 8);
        MazeGen::from_seed(9).generate(&mut g);
        for c in 0..8 {
            assert_eq!(g.at(Pos::new(5, c)), Some(CellKind::Wall));
        }
        for r in 0..6 {
            assert_eq!(g.at(Pos::new(r, 7)), Some(CellKind::Wall));
        }
    }

    #[test]
    fn large_grid_does_not_overflow_the_stack() {
        let mut g = Grid::new(501, 501);
        let carved = MazeGen::from_seed(5).generate(&mut g);
        // 251 * 251 rooms plus one wall per tree edge.
        assert_eq!(carved, 251 * 251 * 2 - 1);
    }

    #[test]
    fn path_exists_between_corners() {
        let mut g = Grid::new(9, 9);
        MazeGen::from_seed(11).generate(&mut g);
        let outcome = mazeviz_paths::bfs(&mut g, Pos::ORIGIN, Pos::new(8, 8));
        assert!(outcome.is_found());
    }
}
