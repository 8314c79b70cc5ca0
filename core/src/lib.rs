use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use event::*;
pub use generator::*;
pub use grid::*;
pub use matcher::*;
pub use session::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod event;
mod generator;
mod grid;
mod matcher;
mod session;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub pos: Coord2,
    pub hits_to_break: u8,
}

/// Immutable description of one level, loaded by the host before a session
/// starts and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub level_number: u32,
    pub board_size: Coord,
    pub move_limit: u32,
    /// Seconds.
    pub time_limit: f32,
    pub category_count: u8,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
    #[serde(default)]
    pub locked: Vec<Coord2>,
    /// Minimum scores for one, two, and three stars, ascending.
    pub star_thresholds: [u32; 3],
}

impl LevelConfig {
    /// Rejects malformed configs up front so the board loop never has to
    /// defend against them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < 4 {
            return Err(ConfigError::BoardTooSmall(self.board_size));
        }
        if self.category_count == 0 {
            return Err(ConfigError::NoCategories);
        }
        if self.move_limit == 0 {
            return Err(ConfigError::NoMoves);
        }
        if self.time_limit <= 0.0 {
            return Err(ConfigError::NoTime);
        }
        for spec in &self.obstacles {
            if spec.pos.0 >= self.board_size || spec.pos.1 >= self.board_size {
                return Err(ConfigError::ObstacleOutOfBounds(spec.pos.0, spec.pos.1));
            }
        }
        for &(x, y) in &self.locked {
            if x >= self.board_size || y >= self.board_size {
                return Err(ConfigError::LockedOutOfBounds(x, y));
            }
        }
        let [one, two, three] = self.star_thresholds;
        if one > two || two > three {
            return Err(ConfigError::StarThresholdsNotAscending);
        }
        Ok(())
    }

    pub fn stars_for_score(&self, score: u32) -> u8 {
        let [one, two, three] = self.star_thresholds;
        if score >= three {
            3
        } else if score >= two {
            2
        } else if score >= one {
            1
        } else {
            0
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.board_size, self.board_size)
    }
}
