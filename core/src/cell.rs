use serde::{Deserialize, Serialize};

/// Matchable kind of a piece. Valid values are `0..LevelConfig::category_count`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Category(pub u8);

/// Canonical content of one board coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Transient hole during resolution; never persisted on a stable board.
    Empty,
    Piece {
        category: Category,
        locked: bool,
    },
    /// Immovable, non-matchable blocker, optionally hiding the piece it replaced.
    Obstacle {
        hits_taken: u8,
        hits_to_break: u8,
        hidden: Option<Category>,
    },
    /// Spawned from a 4-match; swapping it next to an ordinary piece clears
    /// every piece of that piece's category.
    Special(Category),
}

impl Cell {
    pub fn piece(category: Category) -> Self {
        Self::Piece {
            category,
            locked: false,
        }
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn is_obstacle(self) -> bool {
        matches!(self, Self::Obstacle { .. })
    }

    pub const fn is_special(self) -> bool {
        matches!(self, Self::Special(_))
    }

    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Piece { locked: true, .. })
    }

    /// Whether gravity moves this cell. Obstacles stay put, empties are the
    /// holes being filled.
    pub const fn falls(self) -> bool {
        matches!(self, Self::Piece { .. } | Self::Special(_))
    }

    /// Category considered by match detection. Locked pieces and obstacles
    /// never match anything, including each other.
    pub const fn match_category(self) -> Option<Category> {
        match self {
            Self::Piece {
                category,
                locked: false,
            } => Some(category),
            Self::Special(category) => Some(category),
            _ => None,
        }
    }

    /// Category resolved through a special piece directly, and through an
    /// obstacle only when it hides one.
    pub const fn resolved_category(self) -> Option<Category> {
        match self {
            Self::Piece { category, .. } => Some(category),
            Self::Special(category) => Some(category),
            Self::Obstacle { hidden, .. } => hidden,
            Self::Empty => None,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Empty
    }
}
