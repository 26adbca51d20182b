//! Maze generation for mazeviz grids.

pub mod mapgen;

pub use mapgen::MazeGen;
