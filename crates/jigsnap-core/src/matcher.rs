//! Spatial matching between pieces.
//!
//! Two pieces match when they are edge neighbors in the grid and their current
//! relative placement is within the snap tolerance of their assembled placement.

use crate::grid::Piece;
use crate::scene::Scene;
use kurbo::Vec2;

/// Panics unless both pieces have the same dimensions, i.e. come from the same grid.
fn assert_same_grid(p1: &Piece, p2: &Piece) {
    assert!(
        p1.width() == p2.width() && p1.height() == p2.height(),
        "pieces {} and {} have mismatched dimensions ({}x{} vs {}x{})",
        p1.id(),
        p2.id(),
        p1.width(),
        p1.height(),
        p2.width(),
        p2.height(),
    );
}

/// Check if two pieces share an edge in the grid (never diagonally, never with themselves).
pub fn are_neighbors(p1: &Piece, p2: &Piece) -> bool {
    assert_same_grid(p1, p2);
    let same_col = p1.col() == p2.col();
    let same_row = p1.row() == p2.row();
    (same_col && p1.row().abs_diff(p2.row()) == 1)
        || (same_row && p1.col().abs_diff(p2.col()) == 1)
}

/// Where `p2` currently sits relative to `p1`.
pub fn relative_position<S: Scene + ?Sized>(scene: &S, p1: &Piece, p2: &Piece) -> Vec2 {
    scene.absolute_position(p2.id()) - scene.absolute_position(p1.id())
}

/// Vector `target` would occupy relative to `piece` in the assembled image.
pub fn correct_relative(piece: &Piece, target: &Piece) -> Vec2 {
    assert_same_grid(piece, target);
    let dcol = f64::from(target.col()) - f64::from(piece.col());
    let drow = f64::from(target.row()) - f64::from(piece.row());
    Vec2::new(piece.width() * dcol, piece.height() * drow)
}

/// Signed error between the current and the assembled relative placement.
///
/// Moving `piece` by the returned vector aligns it exactly with `target`.
pub fn correct_offset<S: Scene + ?Sized>(scene: &S, piece: &Piece, target: &Piece) -> Vec2 {
    relative_position(scene, piece, target) - correct_relative(piece, target)
}

/// Chebyshev tolerance test: `max(|x|, |y|) < tolerance`.
pub fn should_snap(offset: Vec2, tolerance: f64) -> bool {
    offset.x.abs().max(offset.y.abs()) < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid, GridCoord, GridSpec};
    use crate::group::GroupId;
    use crate::scene::MemoryScene;
    use kurbo::Point;

    fn grid(columns: u32, rows: u32) -> Grid {
        Grid::new(GridSpec::new(columns, rows, 100.0, 50.0).unwrap()).unwrap()
    }

    fn at(grid: &Grid, col: u32, row: u32) -> Piece {
        *grid.piece_at(GridCoord::new(col, row)).unwrap()
    }

    #[test]
    fn test_neighbors_are_symmetric() {
        let grid = grid(4, 4);
        for a in grid.pieces() {
            for b in grid.pieces() {
                assert_eq!(are_neighbors(a, b), are_neighbors(b, a));
            }
        }
    }

    #[test]
    fn test_not_own_neighbor_and_no_diagonals() {
        let grid = grid(4, 4);
        for a in grid.pieces() {
            assert!(!are_neighbors(a, a));
            for b in grid.pieces() {
                if a.col().abs_diff(b.col()) == 1 && a.row().abs_diff(b.row()) == 1 {
                    assert!(!are_neighbors(a, b));
                }
            }
        }
    }

    #[test]
    fn test_edge_neighbors() {
        let grid = grid(3, 3);
        let center = at(&grid, 1, 1);
        assert!(are_neighbors(&center, &at(&grid, 1, 0)));
        assert!(are_neighbors(&center, &at(&grid, 2, 1)));
        assert!(are_neighbors(&center, &at(&grid, 1, 2)));
        assert!(are_neighbors(&center, &at(&grid, 0, 1)));
        assert!(!are_neighbors(&at(&grid, 0, 0), &at(&grid, 2, 0)));
    }

    #[test]
    fn test_correct_offset_sign() {
        let grid = grid(2, 2);
        let a = at(&grid, 0, 0);
        let b = at(&grid, 1, 1);
        let mut scene = MemoryScene::new();
        scene.add_piece(a.id(), GroupId(0), Point::new(10.0, 10.0));
        scene.add_piece(b.id(), GroupId(1), Point::new(117.0, 55.0));

        // Assembled: b sits at a + (100, 50).
        assert_eq!(correct_relative(&a, &b), Vec2::new(100.0, 50.0));
        assert_eq!(correct_offset(&scene, &a, &b), Vec2::new(7.0, -5.0));
        // Seen from the other side the error flips sign.
        assert_eq!(correct_offset(&scene, &b, &a), Vec2::new(-7.0, 5.0));
    }

    #[test]
    fn test_should_snap_uses_chebyshev_distance() {
        assert!(should_snap(Vec2::new(15.0, 0.0), 20.0));
        assert!(should_snap(Vec2::new(-19.9, 19.9), 20.0));
        // Euclidean length here is ~26.9, still snaps.
        assert!(should_snap(Vec2::new(19.0, -19.0), 20.0));
        assert!(!should_snap(Vec2::new(0.0, 30.0), 20.0));
        assert!(!should_snap(Vec2::new(20.0, 0.0), 20.0));
    }

    #[test]
    #[should_panic(expected = "mismatched dimensions")]
    fn test_mismatched_dimensions_fail_fast() {
        let small = grid(2, 1);
        let large = Grid::new(GridSpec::new(2, 1, 120.0, 50.0).unwrap()).unwrap();
        let _ = correct_relative(&at(&small, 0, 0), &at(&large, 1, 0));
    }

    #[test]
    #[should_panic(expected = "mismatched dimensions")]
    fn test_neighbors_across_grids_fail_fast() {
        let small = grid(2, 1);
        let large = Grid::new(GridSpec::new(2, 1, 100.0, 75.0).unwrap()).unwrap();
        let _ = are_neighbors(&at(&small, 0, 0), &at(&large, 1, 0));
    }
}
