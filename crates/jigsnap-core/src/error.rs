//! Error types for puzzle construction and the drag API.

use crate::grid::{GridCoord, PieceId};
use crate::group::GroupId;
use thiserror::Error;

/// Puzzle errors.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
    #[error("Invalid snap distance: {0}")]
    InvalidSnapDistance(f64),
    #[error("Unknown piece: {0}")]
    UnknownPiece(PieceId),
    #[error("Unknown group: {0}")]
    UnknownGroup(GroupId),
    #[error("Coordinate {0} is already taken")]
    DuplicateCoord(GridCoord),
    #[error("Coordinate {0} is outside the grid")]
    CoordOutOfRange(GridCoord),
    #[error("Group partition is broken: {0}")]
    BrokenPartition(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Image error: {0}")]
    Image(String),
}

impl From<serde_json::Error> for PuzzleError {
    fn from(e: serde_json::Error) -> Self {
        PuzzleError::Config(e.to_string())
    }
}

impl From<image::ImageError> for PuzzleError {
    fn from(e: image::ImageError) -> Self {
        PuzzleError::Image(e.to_string())
    }
}

/// Result type for puzzle operations.
pub type Result<T> = std::result::Result<T, PuzzleError>;
