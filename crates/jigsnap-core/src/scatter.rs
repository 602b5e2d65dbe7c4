//! Random initial placement of pieces on the board.

use kurbo::{Point, Size};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A whole-pixel position keeping a `piece`-sized tile inside `board`.
///
/// When the board is not larger than the piece along an axis, or the span is not
/// finite, that axis collapses to 0.
pub fn random_position<R: Rng>(rng: &mut R, board: Size, piece: Size) -> Point {
    Point::new(
        random_offset(rng, board.width - piece.width),
        random_offset(rng, board.height - piece.height),
    )
}

fn random_offset<R: Rng>(rng: &mut R, span: f64) -> f64 {
    if span.is_finite() && span > 0.0 {
        let offset: f64 = rng.random_range(0.0..span);
        offset.floor()
    } else {
        0.0
    }
}

/// Deterministic scatter of `count` pieces for a given seed.
pub fn scatter_positions(count: usize, board: Size, piece: Size, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| random_position(&mut rng, board, piece))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_stay_on_board() {
        let board = Size::new(800.0, 600.0);
        let piece = Size::new(120.0, 90.0);
        for position in scatter_positions(500, board, piece, 7) {
            assert!(position.x >= 0.0 && position.x + piece.width <= board.width);
            assert!(position.y >= 0.0 && position.y + piece.height <= board.height);
            assert_eq!(position.x, position.x.floor());
            assert_eq!(position.y, position.y.floor());
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let board = Size::new(640.0, 480.0);
        let piece = Size::new(64.0, 48.0);
        assert_eq!(
            scatter_positions(20, board, piece, 42),
            scatter_positions(20, board, piece, 42)
        );
        assert_ne!(
            scatter_positions(20, board, piece, 42),
            scatter_positions(20, board, piece, 43)
        );
    }

    #[test]
    fn test_piece_larger_than_board() {
        let positions = scatter_positions(3, Size::new(50.0, 500.0), Size::new(80.0, 40.0), 1);
        assert!(positions.iter().all(|p| p.x == 0.0));
    }

    #[test]
    fn test_unbounded_board_collapses() {
        let board = Size::new(f64::INFINITY, 600.0);
        let positions = scatter_positions(5, board, Size::new(80.0, 40.0), 3);
        assert!(positions.iter().all(|p| p.x == 0.0 && p.y < 560.0));

        let nan = Size::new(f64::NAN, f64::NAN);
        assert!(scatter_positions(5, nan, Size::new(80.0, 40.0), 3)
            .iter()
            .all(|p| *p == Point::ZERO));
    }
}
