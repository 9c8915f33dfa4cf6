//! Error types for Kshetra

use thiserror::Error;

use crate::core::{GridCoord, WorldPoint};
use crate::pathfinding::PathFailure;

/// Kshetra error type
#[derive(Error, Debug)]
pub enum KshetraError {
    /// Search exhausted without reaching the goal. Always recoverable.
    #[error("No path found: {0}")]
    NoPathFound(PathFailure),

    /// A requested point lies outside the domain bounds.
    #[error("Waypoint ({:.2}, {:.2}) lies outside the domain", .0.x, .0.y)]
    InvalidWaypoint(WorldPoint),

    /// The goal cell is free but fully enclosed by obstacles.
    #[error("Goal cell ({}, {}) is enclosed by obstacles", .0.x, .0.y)]
    DegenerateObstacleConfiguration(GridCoord),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KshetraError {
    /// Is this a failure the navigation stack absorbs on its own?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            KshetraError::NoPathFound(_) | KshetraError::InvalidWaypoint(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, KshetraError>;
