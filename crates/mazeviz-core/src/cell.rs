//! The [`CellKind`] type: what a single grid cell currently holds.

use std::fmt;

/// State of one grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    #[default]
    Empty,
    Start,
    End,
    Wall,
    /// Search marker: discovered by the running search.
    Visited,
    /// Search marker: the cell currently being expanded.
    Frontier,
    /// The manually controlled marker of a solve session.
    UserToken,
}

impl CellKind {
    /// Whether this kind is one of the three user-placeable kinds.
    #[inline]
    pub const fn is_placeable(self) -> bool {
        matches!(self, Self::Start | Self::End | Self::Wall)
    }

    /// Whether this kind is a marker written by a search or a solve
    /// session, i.e. something [`Grid::clear_transient_markers`] removes.
    ///
    /// [`Grid::clear_transient_markers`]: crate::Grid::clear_transient_markers
    #[inline]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Visited | Self::Frontier | Self::UserToken)
    }

    /// Whether a walker or a search may pass through this cell.
    #[inline]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    /// Character used by the ASCII grid format.
    pub const fn rune(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Start => 'S',
            Self::End => 'E',
            Self::Wall => '#',
            Self::Visited => 'o',
            Self::Frontier => '*',
            Self::UserToken => '@',
        }
    }

    /// Inverse of [`rune`](Self::rune).
    pub const fn from_rune(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Self::Empty),
            'S' => Some(Self::Start),
            'E' => Some(Self::End),
            '#' => Some(Self::Wall),
            'o' => Some(Self::Visited),
            '*' => Some(Self::Frontier),
            '@' => Some(Self::UserToken),
            _ => None,
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rune())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CellKind; 7] = [
        CellKind::Empty,
        CellKind::Start,
        CellKind::End,
        CellKind::Wall,
        CellKind::Visited,
        CellKind::Frontier,
        CellKind::UserToken,
    ];

    #[test]
    fn runes_are_distinct_and_invertible() {
        for k in ALL {
            assert_eq!(CellKind::from_rune(k.rune()), Some(k));
        }
        assert_eq!(CellKind::from_rune('x'), None);
    }

    #[test]
    fn transient_and_placeable_are_disjoint() {
        for k in ALL {
            assert!(!(k.is_transient() && k.is_placeable()));
        }
        assert!(!CellKind::Empty.is_transient());
        assert!(!CellKind::Empty.is_placeable());
    }

    #[test]
    fn only_walls_block() {
        for k in ALL {
            assert_eq!(k.is_passable(), k != CellKind::Wall);
        }
    }
}
