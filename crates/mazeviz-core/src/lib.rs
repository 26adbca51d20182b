//! **mazeviz-core**: core types of the maze visualiser.
//!
//! This crate provides the grid every other *mazeviz* crate operates on:
//! `(row, column)` positions, cell kinds, and the [`Grid`] itself with its
//! placement rules, neighbour queries and transient search markers.

pub mod cell;
pub mod error;
pub mod geom;
pub mod grid;

pub use cell::CellKind;
pub use error::{GridParseError, PlacementError};
pub use geom::{Direction, Pos};
pub use grid::Grid;
