//! Error types for grid editing and parsing.

use std::fmt;

use crate::cell::CellKind;
use crate::geom::Pos;

/// Why a [`Grid::try_place`](crate::Grid::try_place) call was refused.
///
/// Refusals are recoverable: [`Grid::place`](crate::Grid::place) turns them
/// into a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// Target position lies outside the grid.
    OutOfBounds(Pos),
    /// Target already holds a Start, End or Wall.
    Occupied { pos: Pos, by: CellKind },
    /// A Start already exists at the given position.
    DuplicateStart(Pos),
    /// An End already exists at the given position.
    DuplicateEnd(Pos),
    /// Only Start, End and Wall can be placed.
    NotPlaceable(CellKind),
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(p) => write!(f, "position {p} is outside the grid"),
            Self::Occupied { pos, by } => write!(f, "position {pos} is occupied by {by:?}"),
            Self::DuplicateStart(p) => write!(f, "a start cell already exists at {p}"),
            Self::DuplicateEnd(p) => write!(f, "an end cell already exists at {p}"),
            Self::NotPlaceable(k) => write!(f, "{k:?} cannot be placed by hand"),
        }
    }
}

impl std::error::Error for PlacementError {}

/// Errors that can occur when parsing an ASCII grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridParseError {
    /// A row does not have the same width as the first row.
    InconsistentSize { row: i32, expected: i32, found: i32 },
    /// A character that is not a cell rune was found.
    InvalidRune { ch: char, pos: Pos },
    DuplicateStart { first: Pos, second: Pos },
    DuplicateEnd { first: Pos, second: Pos },
}

impl fmt::Display for GridParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentSize {
                row,
                expected,
                found,
            } => write!(
                f,
                "grid: row {row} has width {found}, expected {expected}"
            ),
            Self::InvalidRune { ch, pos } => {
                write!(f, "grid contains invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::DuplicateStart { first, second } => {
                write!(f, "grid has two start cells: {first} and {second}")
            }
            Self::DuplicateEnd { first, second } => {
                write!(f, "grid has two end cells: {first} and {second}")
            }
        }
    }
}

impl std::error::Error for GridParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_position() {
        let e = PlacementError::DuplicateStart(Pos::new(1, 2));
        assert_eq!(e.to_string(), "a start cell already exists at (1, 2)");
        let e = GridParseError::InvalidRune {
            ch: 'x',
            pos: Pos::new(0, 3),
        };
        assert!(e.to_string().contains("(0, 3)"));
    }
}
