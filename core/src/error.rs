use thiserror::Error;

/// Reasons a swap request is rejected. All are recoverable and leave the
/// session untouched.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Cells are not adjacent")]
    NotAdjacent,
    #[error("Cell is occupied by an obstacle")]
    Obstacle,
    #[error("Cell is empty")]
    EmptyCell,
    #[error("Piece is locked")]
    Locked,
    #[error("A swap is already being resolved")]
    SessionBusy,
    #[error("Game already ended, no new moves are accepted")]
    GameOver,
}

/// Malformed level configuration, rejected at load time before a session is
/// ever constructed.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board size {0} is too small, need at least 4")]
    BoardTooSmall(u8),
    #[error("Level must define at least one piece category")]
    NoCategories,
    #[error("Move limit must be positive")]
    NoMoves,
    #[error("Time limit must be positive")]
    NoTime,
    #[error("Obstacle position ({0}, {1}) is out of bounds")]
    ObstacleOutOfBounds(u8, u8),
    #[error("Locked piece position ({0}, {1}) is out of bounds")]
    LockedOutOfBounds(u8, u8),
    #[error("Supplied grid size {actual} does not match configured board size {expected}")]
    GridSizeMismatch { actual: u8, expected: u8 },
    #[error("Star thresholds must be ascending")]
    StarThresholdsNotAscending,
}

pub type Result<T, E = SwapError> = core::result::Result<T, E>;
