use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchShape {
    Line3,
    Line4,
    Block2x2,
}

impl MatchShape {
    pub const fn cell_count(self) -> usize {
        match self {
            Self::Line3 => 3,
            Self::Line4 | Self::Block2x2 => 4,
        }
    }

    /// Base score awarded for clearing a match of this shape.
    pub const fn score(self) -> u32 {
        match self {
            Self::Line3 => 10,
            Self::Line4 | Self::Block2x2 => 20,
        }
    }

    /// Four-cell matches leave a special piece behind at the anchor.
    pub const fn spawns_special(self) -> bool {
        matches!(self, Self::Line4 | Self::Block2x2)
    }
}

/// One matchable group found on the board. `coords[0]` is the anchor, the
/// top/left-most cell in scan order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub shape: MatchShape,
    pub category: Category,
    pub coords: SmallVec<[Coord2; 4]>,
}

impl Match {
    pub fn anchor(&self) -> Coord2 {
        self.coords[0]
    }
}

fn run_category(grid: &Grid, coords: &[Coord2]) -> Option<Category> {
    let first = grid.match_category_at(coords[0])?;
    coords[1..]
        .iter()
        .all(|&pos| grid.match_category_at(pos) == Some(first))
        .then_some(first)
}

/// Scans for the highest-priority match: a first full pass returns any
/// 4-line or 2x2 block, and only when that pass comes up empty does a second
/// pass look for plain 3-lines. `None` doubles as the board's stable signal.
pub fn find_best_match(grid: &Grid) -> Option<Match> {
    let size = grid.size();
    // anchor limits computed up front so the coordinate arithmetic below
    // can never wrap
    let line4_limit = size.saturating_sub(3);
    let line3_limit = size.saturating_sub(2);
    let block_limit = size.saturating_sub(1);

    for x in 0..size {
        for y in 0..size {
            if x < line4_limit {
                let coords: SmallVec<[Coord2; 4]> =
                    smallvec![(x, y), (x + 1, y), (x + 2, y), (x + 3, y)];
                if let Some(category) = run_category(grid, &coords) {
                    return Some(Match {
                        shape: MatchShape::Line4,
                        category,
                        coords,
                    });
                }
            }
            if y < line4_limit {
                let coords: SmallVec<[Coord2; 4]> =
                    smallvec![(x, y), (x, y + 1), (x, y + 2), (x, y + 3)];
                if let Some(category) = run_category(grid, &coords) {
                    return Some(Match {
                        shape: MatchShape::Line4,
                        category,
                        coords,
                    });
                }
            }
            if x < block_limit && y < block_limit {
                let coords: SmallVec<[Coord2; 4]> =
                    smallvec![(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)];
                if let Some(category) = run_category(grid, &coords) {
                    return Some(Match {
                        shape: MatchShape::Block2x2,
                        category,
                        coords,
                    });
                }
            }
        }
    }

    for x in 0..size {
        for y in 0..size {
            if x < line3_limit {
                let coords: SmallVec<[Coord2; 4]> = smallvec![(x, y), (x + 1, y), (x + 2, y)];
                if let Some(category) = run_category(grid, &coords) {
                    return Some(Match {
                        shape: MatchShape::Line3,
                        category,
                        coords,
                    });
                }
            }
            if y < line3_limit {
                let coords: SmallVec<[Coord2; 4]> = smallvec![(x, y), (x, y + 1), (x, y + 2)];
                if let Some(category) = run_category(grid, &coords) {
                    return Some(Match {
                        shape: MatchShape::Line3,
                        category,
                        coords,
                    });
                }
            }
        }
    }

    None
}
