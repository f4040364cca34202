//! Construction-time errors
//!
//! Everything that can go wrong is caught while building a session. Once a
//! [`crate::GameSession`] exists, ticking it cannot fail.

use thiserror::Error;

/// Malformed maze or game configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("maze has {actual} cells but {rows}x{columns} requires {expected}")]
    CellCountMismatch {
        rows: usize,
        columns: usize,
        expected: usize,
        actual: usize,
    },

    #[error("maze dimensions must be non-zero (got {rows}x{columns})")]
    EmptyMaze { rows: usize, columns: usize },

    #[error("maze has no walkable cells")]
    NoRoadCells,

    #[error("waypoint list is empty")]
    NoWaypoints,

    #[error("{what} cell ({row}, {column}) lies outside the {rows}x{columns} maze")]
    CellOutOfBounds {
        what: &'static str,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    #[error("{what} cell ({row}, {column}) is a wall")]
    CellIsWall {
        what: &'static str,
        row: usize,
        column: usize,
    },

    #[error("{what} cell ({row}, {column}) is cut off from the rest of the maze")]
    Unreachable {
        what: &'static str,
        row: usize,
        column: usize,
    },

    #[error("at least one ghost must be configured")]
    NoAdversaries,

    #[error("{what} must be positive (got {value})")]
    NonPositive { what: &'static str, value: f32 },

    #[error("{what} must last at least one tick")]
    ZeroDuration { what: &'static str },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
