//! Headless puzzle session: image loading, slicing, scattering and an autoplay bot.

use image::{Rgba, RgbaImage};
use jigsnap_core::{
    GridSpec, GroupId, MemoryScene, PieceId, Puzzle, PuzzleError, PuzzleOptions, correct_offset,
    fit_to_board, resize_to, scatter_positions, slice_image,
};
use kurbo::{Size, Vec2};
use rand::Rng;
use thiserror::Error;

/// Size of the generated picture used when no image is given.
const SYNTHETIC_WIDTH: u32 = 640;
const SYNTHETIC_HEIGHT: u32 = 480;

/// Pointer-move steps per autoplay drag.
const DRAG_STEPS: u32 = 4;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),

    #[error("Guided drop of {0} did not snap")]
    Stalled(GroupId),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Summary of an autoplay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayReport {
    pub drags: u32,
    pub solved: bool,
    pub groups_left: usize,
}

/// A puzzle laid out on a board, driven without a display.
#[derive(Debug)]
pub struct Session {
    puzzle: Puzzle<MemoryScene>,
    board: Size,
    picture: Size,
}

impl Session {
    /// Fit `image` (or a generated gradient) to the board, slice it and scatter the pieces.
    pub fn new(options: PuzzleOptions, board: Size, image: Option<RgbaImage>, seed: u64) -> Result<Self> {
        options.validate()?;
        let usable = |side: f64| side.is_finite() && side > 0.0;
        if !usable(board.width) || !usable(board.height) {
            return Err(PuzzleError::Config(format!(
                "board must be a positive finite size, got {}x{}",
                board.width, board.height
            ))
            .into());
        }
        let source = image.unwrap_or_else(|| gradient_image(SYNTHETIC_WIDTH, SYNTHETIC_HEIGHT));
        let (width, height) = source.dimensions();
        let picture = fit_to_board(Size::new(f64::from(width), f64::from(height)), board);
        let resized = resize_to(&source, picture);

        let columns = options.pieces.x;
        let rows = options.pieces.y;
        let tiles = slice_image(&resized, columns, rows)?;
        let tile_size = tiles
            .first()
            .map(|t| t.tile.size())
            .ok_or_else(|| PuzzleError::InvalidGrid("image produced no tiles".to_string()))?;
        let spec = GridSpec::new(columns, rows, tile_size.width, tile_size.height)?;

        let positions = scatter_positions(tiles.len(), board, tile_size, seed);
        let mut puzzle = Puzzle::new(spec, options, MemoryScene::new())?;
        for (sliced, position) in tiles.into_iter().zip(positions) {
            puzzle.add_piece(
                sliced.coord,
                tile_size.width,
                tile_size.height,
                Some(sliced.tile),
                position,
            )?;
        }

        log::info!(
            "Session ready: {}x{} pieces of {}x{} px on a {}x{} board (seed {})",
            columns,
            rows,
            tile_size.width,
            tile_size.height,
            board.width,
            board.height,
            seed
        );
        Ok(Self {
            puzzle,
            board,
            picture,
        })
    }

    pub fn puzzle(&self) -> &Puzzle<MemoryScene> {
        &self.puzzle
    }

    pub fn puzzle_mut(&mut self) -> &mut Puzzle<MemoryScene> {
        &mut self.puzzle
    }

    pub fn board(&self) -> Size {
        self.board
    }

    /// Size of the assembled picture once fitted to the board.
    pub fn picture(&self) -> Size {
        self.picture
    }

    /// Play until solved or until `max_drags` drops were made.
    ///
    /// Each drop carries a group bordering the group of piece 0 next to it,
    /// off by less than the snap distance.
    pub fn autoplay<R: Rng>(&mut self, max_drags: u32, rng: &mut R) -> Result<AutoplayReport> {
        let mut drags = 0;
        self.puzzle.check_done();
        while !self.puzzle.is_done() && drags < max_drags {
            let Some((group, delta)) = self.next_move(rng)? else {
                break;
            };
            self.puzzle.begin_drag(group)?;
            let step = delta / f64::from(DRAG_STEPS);
            for _ in 0..DRAG_STEPS {
                self.puzzle.drag_by(group, step)?;
            }
            let outcome = self.puzzle.end_drag(group)?;
            drags += 1;
            if !outcome.snapped() {
                return Err(AppError::Stalled(group));
            }
            log::debug!(
                "drop {}: {} merges, {} groups left",
                drags,
                outcome.merges.len(),
                self.puzzle.live_group_count()
            );
        }

        let report = AutoplayReport {
            drags,
            solved: self.puzzle.is_done(),
            groups_left: self.puzzle.live_group_count(),
        };
        if !report.solved {
            log::warn!(
                "Autoplay stopped after {} drags with {} groups left",
                report.drags,
                report.groups_left
            );
        }
        Ok(report)
    }

    /// Pick a group touching the anchor group and the delta that lands it nearly in place.
    fn next_move<R: Rng>(&self, rng: &mut R) -> Result<Option<(GroupId, Vec2)>> {
        let anchor = self.puzzle.group_of(PieceId(0))?;
        let registry = self.puzzle.registry();
        let grid = self.puzzle.grid();

        let mut candidates = Vec::new();
        for &fixed in registry.members(anchor) {
            for &loose in grid.neighbors_of(fixed) {
                if !registry.same_group(fixed, loose) {
                    candidates.push((loose, fixed));
                }
            }
        }
        if candidates.is_empty() {
            return Ok(None);
        }

        let (loose, fixed) = candidates[rng.random_range(0..candidates.len())];
        let offset = correct_offset(
            self.puzzle.scene(),
            self.puzzle.piece(loose)?,
            self.puzzle.piece(fixed)?,
        );
        let reach = (self.puzzle.snap_distance() - 1.0).max(0.0).floor() as i32;
        let jitter = Vec2::new(
            f64::from(rng.random_range(-reach..=reach)),
            f64::from(rng.random_range(-reach..=reach)),
        );
        Ok(Some((self.puzzle.group_of(loose)?, offset + jitter)))
    }
}

/// A gradient picture, distinct at every pixel row and column.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgba([r, g, 128, 255])
    })
}
