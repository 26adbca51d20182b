//! Maze generation and pathfinding visualiser engine.
//!
//! This crate ties the pieces together behind [`Visualizer`]: a rectangular
//! [`Grid`] the user edits, a recursive-backtracking maze generator, two
//! step-wise shortest-path searches (BFS and uniform-cost) and a timed
//! manual "solve" mode. It does no drawing and reads no input devices; a
//! presentation layer calls the commands and renders the grid.
//!
//! ```
//! use mazeviz::{CellKind, Pos, Visualizer, VisualizerConfig};
//!
//! let config = VisualizerConfig { rows: 5, columns: 5, ..Default::default() };
//! let mut vis = Visualizer::new(config).unwrap();
//! vis.place(CellKind::Start, Pos::new(0, 0));
//! vis.place(CellKind::End, Pos::new(4, 4));
//! let path = vis.run_bfs(Pos::new(0, 0), Pos::new(4, 4), None).unwrap();
//! assert_eq!(path.len(), 9);
//! ```

mod config;
mod visualizer;

pub use config::{ConfigError, VisualizerConfig};
pub use visualizer::{OnStep, Visualizer};

pub use mazeviz_core::{CellKind, Direction, Grid, GridParseError, PlacementError, Pos};
pub use mazeviz_gen::MazeGen;
pub use mazeviz_paths::{
    Bfs, Dijkstra, PathSearch, Search, SearchKind, SearchOutcome, Step, UNREACHABLE, Visit,
};
pub use mazeviz_solve::{
    Clock, HeldArrows, ManualClock, MovePacer, Phase, SolveError, SolveSession, SystemClock,
};
