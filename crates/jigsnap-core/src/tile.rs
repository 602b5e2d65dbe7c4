//! Source image sizing and slicing into per-piece raster tiles.

use crate::error::{PuzzleError, Result};
use crate::grid::GridCoord;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use kurbo::Size;
use std::path::Path;

/// Largest share of the board height the assembled image may take.
const MAX_BOARD_HEIGHT_RATIO: f64 = 0.8;

/// RGBA8 pixels of a single piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterTile {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterTile {
    /// Wrap raw RGBA8 pixels, checking the buffer length.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(PuzzleError::Image(format!(
                "tile {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at `(x, y)` inside the tile.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[start..start + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn to_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }
}

/// A tile together with the grid coordinate it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicedTile {
    pub coord: GridCoord,
    pub tile: RasterTile,
}

/// Size of the assembled image on a board, keeping the image aspect ratio.
///
/// The image is first given half the board width, clamped to 80% of the board
/// height, and the width is then derived back from the clamped height.
pub fn fit_to_board(image: Size, board: Size) -> Size {
    if image.width <= 0.0 || image.height <= 0.0 {
        log::warn!("cannot fit an empty image ({}x{})", image.width, image.height);
        return Size::ZERO;
    }
    let ratio = image.height / image.width;
    let width = board.width / 2.0;
    let height = (width * ratio).min(board.height * MAX_BOARD_HEIGHT_RATIO);
    Size::new(height / ratio, height)
}

/// Decode PNG, JPEG or WebP bytes.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Open and decode an image file.
pub fn open_image(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)?.to_rgba8())
}

/// Resample an image to the given size (rounded to whole pixels, at least 1x1).
pub fn resize_to(image: &RgbaImage, size: Size) -> RgbaImage {
    let width = (size.width.round() as u32).max(1);
    let height = (size.height.round() as u32).max(1);
    imageops::resize(image, width, height, FilterType::Triangle)
}

/// Cut an image into `columns`×`rows` equal tiles, column by column.
///
/// Tiles are `floor(width / columns)`×`floor(height / rows)` pixels; leftover
/// pixels on the right and bottom edges are dropped.
pub fn slice_image(image: &RgbaImage, columns: u32, rows: u32) -> Result<Vec<SlicedTile>> {
    if columns == 0 || rows == 0 {
        return Err(PuzzleError::InvalidGrid(format!(
            "cannot slice into {}x{} pieces",
            columns, rows
        )));
    }
    let (width, height) = image.dimensions();
    let tile_width = width / columns;
    let tile_height = height / rows;
    if tile_width == 0 || tile_height == 0 {
        return Err(PuzzleError::InvalidGrid(format!(
            "image {}x{} is too small for {}x{} pieces",
            width, height, columns, rows
        )));
    }

    let mut tiles = Vec::with_capacity(columns as usize * rows as usize);
    for col in 0..columns {
        for row in 0..rows {
            let cell = imageops::crop_imm(
                image,
                col * tile_width,
                row * tile_height,
                tile_width,
                tile_height,
            )
            .to_image();
            tiles.push(SlicedTile {
                coord: GridCoord::new(col, row),
                tile: RasterTile::from_image(cell),
            });
        }
    }
    Ok(tiles)
}
