//! jigsnap core library
//!
//! Piece matching, snapping and grouping for a drag-and-drop jigsaw puzzle.
//! Rendering stays behind the [`Scene`] trait.

pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod group;
pub mod matcher;
pub mod puzzle;
pub mod scatter;
pub mod scene;
pub mod tile;

pub use completion::CompletionDetector;
pub use config::{PieceCount, PuzzleOptions};
pub use engine::{DEFAULT_SNAP_DISTANCE, DragOutcome, SnapEngine};
pub use error::{PuzzleError, Result};
pub use events::{ListenerId, SolvedEvent, SolvedListeners};
pub use grid::{Grid, GridCoord, GridSpec, Piece, PieceId};
pub use group::{Group, GroupId, GroupRegistry, MergeRecord};
pub use matcher::{are_neighbors, correct_offset, correct_relative, relative_position, should_snap};
pub use puzzle::Puzzle;
pub use scatter::{random_position, scatter_positions};
pub use scene::{MemoryScene, Scene};
pub use tile::{RasterTile, SlicedTile, decode_image, fit_to_board, open_image, resize_to, slice_image};
