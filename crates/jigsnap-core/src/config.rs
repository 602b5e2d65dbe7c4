//! Puzzle options, loaded from JSON.
//!
//! ```json
//! { "borderSize": 5, "pieces": { "x": 2, "y": 1 }, "container": "puzzle",
//!   "snapDistance": 20, "showMiniature": true }
//! ```
//!
//! Only `pieces` and `snapDistance` drive the core. The remaining options are
//! carried for the layout shell.

use crate::engine::DEFAULT_SNAP_DISTANCE;
use crate::error::{PuzzleError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Requested grid size in pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceCount {
    /// Horizontal piece count (columns).
    pub x: u32,
    /// Vertical piece count (rows).
    pub y: u32,
}

impl Default for PieceCount {
    fn default() -> Self {
        Self { x: 2, y: 1 }
    }
}

/// Recognized puzzle options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PuzzleOptions {
    /// Border thickness around the board, in pixels.
    pub border_size: u32,
    /// Number of pieces.
    pub pieces: PieceCount,
    /// Id of the element the board is drawn into.
    pub container: String,
    /// Distance in pixels under which two correctly placed pieces snap together.
    pub snap_distance: f64,
    /// Whether the thumbnail of the source image is shown.
    pub show_miniature: bool,
}

impl Default for PuzzleOptions {
    fn default() -> Self {
        Self {
            border_size: 5,
            pieces: PieceCount::default(),
            container: "puzzle".to_string(),
            snap_distance: DEFAULT_SNAP_DISTANCE,
            show_miniature: true,
        }
    }
}

impl PuzzleOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Serialize options to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load options from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            PuzzleError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Check that the options describe a playable puzzle.
    pub fn validate(&self) -> Result<()> {
        if self.pieces.x == 0 || self.pieces.y == 0 {
            return Err(PuzzleError::Config(format!(
                "pieces must be at least 1x1, got {}x{}",
                self.pieces.x, self.pieces.y
            )));
        }
        if !(self.snap_distance.is_finite() && self.snap_distance > 0.0) {
            return Err(PuzzleError::InvalidSnapDistance(self.snap_distance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = PuzzleOptions::default();
        assert_eq!(options.border_size, 5);
        assert_eq!(options.pieces, PieceCount { x: 2, y: 1 });
        assert_eq!(options.container, "puzzle");
        assert_eq!(options.snap_distance, 20.0);
        assert!(options.show_miniature);
    }

    #[test]
    fn test_parse_camel_case() {
        let json = r#"{
            "borderSize": 3,
            "pieces": { "x": 4, "y": 3 },
            "container": "board",
            "snapDistance": 12.5,
            "showMiniature": false
        }"#;
        let options = PuzzleOptions::from_json(json).unwrap();
        assert_eq!(options.border_size, 3);
        assert_eq!(options.pieces, PieceCount { x: 4, y: 3 });
        assert_eq!(options.container, "board");
        assert_eq!(options.snap_distance, 12.5);
        assert!(!options.show_miniature);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let options = PuzzleOptions::from_json(r#"{ "pieces": { "x": 5, "y": 5 } }"#).unwrap();
        assert_eq!(options.pieces, PieceCount { x: 5, y: 5 });
        assert_eq!(options.snap_distance, DEFAULT_SNAP_DISTANCE);
        assert_eq!(options.border_size, 5);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            PuzzleOptions::from_json(r#"{ "pieces": { "x": 0, "y": 2 } }"#),
            Err(PuzzleError::Config(_))
        ));
        assert!(matches!(
            PuzzleOptions::from_json(r#"{ "snapDistance": -1 }"#),
            Err(PuzzleError::InvalidSnapDistance(_))
        ));
        assert!(matches!(
            PuzzleOptions::from_json("{ not json"),
            Err(PuzzleError::Config(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let options = PuzzleOptions {
            snap_distance: 8.0,
            ..PuzzleOptions::default()
        };
        let json = options.to_json().unwrap();
        assert!(json.contains("\"snapDistance\""));
        assert_eq!(PuzzleOptions::from_json(&json).unwrap(), options);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "pieces": {{ "x": 3, "y": 2 }}, "snapDistance": 15 }}"#).unwrap();

        let options = PuzzleOptions::load(file.path()).unwrap();
        assert_eq!(options.pieces, PieceCount { x: 3, y: 2 });
        assert_eq!(options.snap_distance, 15.0);

        let missing = PuzzleOptions::load(Path::new("/nonexistent/jigsnap.json"));
        assert!(matches!(missing, Err(PuzzleError::Io(_))));
    }
}
