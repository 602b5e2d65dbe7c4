//! Grid model: logical piece coordinates and dimensions.

use crate::error::{PuzzleError, Result};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable piece identity, assigned in slicing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl PieceId {
    /// Index of this piece in id-ordered storage.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece#{}", self.0)
    }
}

/// Logical `(col, row)` position of a piece in the assembled image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub col: u32,
    pub row: u32,
}

impl GridCoord {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Applies a signed step, returning `None` when it would leave the non-negative quadrant.
    pub fn offset(self, dcol: i32, drow: i32) -> Option<Self> {
        Some(Self {
            col: self.col.checked_add_signed(dcol)?,
            row: self.row.checked_add_signed(drow)?,
        })
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Steps to the four edge-sharing neighbors (up, right, down, left).
const EDGE_STEPS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Slicing parameters for a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of columns (C).
    pub columns: u32,
    /// Number of rows (R).
    pub rows: u32,
    /// Width of a single piece in pixels (W).
    pub piece_width: f64,
    /// Height of a single piece in pixels (H).
    pub piece_height: f64,
}

impl GridSpec {
    /// Create validated slicing parameters.
    pub fn new(columns: u32, rows: u32, piece_width: f64, piece_height: f64) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(PuzzleError::InvalidGrid(format!(
                "grid must have at least one column and one row, got {}x{}",
                columns, rows
            )));
        }
        if !(piece_width.is_finite() && piece_width > 0.0)
            || !(piece_height.is_finite() && piece_height > 0.0)
        {
            return Err(PuzzleError::InvalidGrid(format!(
                "piece size must be positive, got {}x{}",
                piece_width, piece_height
            )));
        }
        Ok(Self {
            columns,
            rows,
            piece_width,
            piece_height,
        })
    }

    /// Total number of pieces (C×R).
    pub fn piece_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn piece_size(&self) -> Size {
        Size::new(self.piece_width, self.piece_height)
    }

    /// Check whether a coordinate lies in `[0,C)×[0,R)`.
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.col < self.columns && coord.row < self.rows
    }

    /// All coordinates in slicing order (column by column).
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.columns).flat_map(move |col| (0..self.rows).map(move |row| GridCoord::new(col, row)))
    }
}

/// One rectangular tile of the sliced image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    coord: GridCoord,
    width: f64,
    height: f64,
}

impl Piece {
    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    pub fn col(&self) -> u32 {
        self.coord.col
    }

    pub fn row(&self) -> u32 {
        self.coord.row
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// The full set of pieces, indexed by id and by coordinate.
///
/// Pieces are fixed once inserted. The edge adjacency of every piece is kept
/// alongside, sorted by ascending piece id.
#[derive(Debug, Clone)]
pub struct Grid {
    spec: GridSpec,
    pieces: Vec<Piece>,
    by_coord: HashMap<GridCoord, PieceId>,
    adjacency: Vec<Vec<PieceId>>,
}

impl Grid {
    /// Create a grid holding every C×R piece, ids assigned in slicing order.
    pub fn new(spec: GridSpec) -> Result<Self> {
        let mut grid = Self::empty(spec);
        let coords: Vec<GridCoord> = spec.coords().collect();
        for coord in coords {
            grid.insert(coord, spec.piece_width, spec.piece_height)?;
        }
        Ok(grid)
    }

    /// Create a grid with no pieces yet; pieces arrive through [`Grid::insert`].
    pub fn empty(spec: GridSpec) -> Self {
        Self {
            spec,
            pieces: Vec::with_capacity(spec.piece_count()),
            by_coord: HashMap::with_capacity(spec.piece_count()),
            adjacency: Vec::with_capacity(spec.piece_count()),
        }
    }

    /// Insert a piece at `coord` and return its freshly assigned id.
    pub fn insert(&mut self, coord: GridCoord, width: f64, height: f64) -> Result<PieceId> {
        if !self.spec.contains(coord) {
            return Err(PuzzleError::CoordOutOfRange(coord));
        }
        if self.by_coord.contains_key(&coord) {
            return Err(PuzzleError::DuplicateCoord(coord));
        }

        let id = PieceId(self.pieces.len() as u32);
        self.pieces.push(Piece {
            id,
            coord,
            width,
            height,
        });
        self.by_coord.insert(coord, id);

        let mut neighbors = Vec::with_capacity(EDGE_STEPS.len());
        for (dcol, drow) in EDGE_STEPS {
            let Some(other) = coord
                .offset(dcol, drow)
                .and_then(|c| self.by_coord.get(&c).copied())
            else {
                continue;
            };
            neighbors.push(other);
            // The new id is the largest so far, pushing keeps the list sorted.
            self.adjacency[other.index()].push(id);
        }
        neighbors.sort_unstable();
        self.adjacency.push(neighbors);

        Ok(id)
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Get a piece by id.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    /// Get the piece at a grid coordinate.
    pub fn piece_at(&self, coord: GridCoord) -> Option<&Piece> {
        self.by_coord.get(&coord).and_then(|id| self.piece(*id))
    }

    /// All pieces in id order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Edge neighbors of a piece, sorted by ascending id.
    pub fn neighbors_of(&self, id: PieceId) -> &[PieceId] {
        self.adjacency.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Check if every coordinate of the spec has a piece.
    pub fn is_complete(&self) -> bool {
        self.pieces.len() == self.spec.piece_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::are_neighbors;
    use std::collections::HashSet;

    fn spec(columns: u32, rows: u32) -> GridSpec {
        GridSpec::new(columns, rows, 100.0, 80.0).unwrap()
    }

    #[test]
    fn test_grid_covers_every_coord_once() {
        let grid = Grid::new(spec(4, 3)).unwrap();
        assert_eq!(grid.len(), 12);
        assert!(grid.is_complete());

        let coords: HashSet<GridCoord> = grid.pieces().iter().map(|p| p.coord()).collect();
        assert_eq!(coords.len(), 12);
        for piece in grid.pieces() {
            assert!(piece.col() < 4);
            assert!(piece.row() < 3);
        }
    }

    #[test]
    fn test_new_grid_is_full() {
        let mut grid = Grid::new(spec(3, 2)).unwrap();
        assert_eq!(grid.len(), grid.spec().piece_count());
        for coord in spec(3, 2).coords() {
            assert!(grid.piece_at(coord).is_some());
        }
        assert!(matches!(
            grid.insert(GridCoord::new(2, 1), 100.0, 80.0),
            Err(PuzzleError::DuplicateCoord(_))
        ));
        assert_eq!(grid.len(), 6);
    }

    #[test]
    fn test_ids_follow_slicing_order() {
        let grid = Grid::new(spec(2, 3)).unwrap();
        let order: Vec<GridCoord> = grid.pieces().iter().map(|p| p.coord()).collect();
        assert_eq!(
            order,
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(0, 1),
                GridCoord::new(0, 2),
                GridCoord::new(1, 0),
                GridCoord::new(1, 1),
                GridCoord::new(1, 2),
            ]
        );
        for (index, piece) in grid.pieces().iter().enumerate() {
            assert_eq!(piece.id(), PieceId(index as u32));
        }
    }

    #[test]
    fn test_invalid_spec() {
        assert!(matches!(GridSpec::new(0, 2, 10.0, 10.0), Err(PuzzleError::InvalidGrid(_))));
        assert!(matches!(GridSpec::new(2, 0, 10.0, 10.0), Err(PuzzleError::InvalidGrid(_))));
        assert!(matches!(GridSpec::new(2, 2, 0.0, 10.0), Err(PuzzleError::InvalidGrid(_))));
        assert!(matches!(GridSpec::new(2, 2, 10.0, f64::NAN), Err(PuzzleError::InvalidGrid(_))));
    }

    #[test]
    fn test_insert_rejects_duplicates_and_out_of_range() {
        let mut grid = Grid::empty(spec(2, 2));
        grid.insert(GridCoord::new(1, 1), 100.0, 80.0).unwrap();
        assert!(matches!(
            grid.insert(GridCoord::new(1, 1), 100.0, 80.0),
            Err(PuzzleError::DuplicateCoord(_))
        ));
        assert!(matches!(
            grid.insert(GridCoord::new(2, 0), 100.0, 80.0),
            Err(PuzzleError::CoordOutOfRange(_))
        ));
        assert_eq!(grid.len(), 1);
        assert!(!grid.is_complete());
    }

    #[test]
    fn test_adjacency_matches_exhaustive_scan() {
        let grid = Grid::new(spec(5, 4)).unwrap();
        for piece in grid.pieces() {
            let scanned: Vec<PieceId> = grid
                .pieces()
                .iter()
                .filter(|other| are_neighbors(piece, other))
                .map(|other| other.id())
                .collect();
            assert_eq!(grid.neighbors_of(piece.id()), scanned.as_slice());
        }
    }

    #[test]
    fn test_adjacency_with_out_of_order_inserts() {
        let mut grid = Grid::empty(spec(3, 1));
        let right = grid.insert(GridCoord::new(2, 0), 100.0, 80.0).unwrap();
        let left = grid.insert(GridCoord::new(0, 0), 100.0, 80.0).unwrap();
        assert!(grid.neighbors_of(right).is_empty());

        let middle = grid.insert(GridCoord::new(1, 0), 100.0, 80.0).unwrap();
        assert_eq!(grid.neighbors_of(middle), &[right, left]);
        assert_eq!(grid.neighbors_of(left), &[middle]);
    }

    #[test]
    fn test_piece_at() {
        let grid = Grid::new(spec(3, 3)).unwrap();
        let piece = grid.piece_at(GridCoord::new(2, 1)).unwrap();
        assert_eq!(piece.coord(), GridCoord::new(2, 1));
        assert!(grid.piece_at(GridCoord::new(3, 0)).is_none());
    }
}
