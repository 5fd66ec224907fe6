//! Mosaic assembly
//!
//! Stitches the tiles of a [`TileGrid`] into one georeferenced raster. Each
//! column is stacked north to south, then the columns are placed west to
//! east. Columns are independent and are built in parallel on the rayon pool.

mod error;
mod tile_set;

pub use error::MosaicError;
pub use tile_set::TileSet;

use std::io;
use std::path::Path;

use image::{imageops, RgbImage};
use rayon::prelude::*;
use tracing::debug;

use crate::georef::{world_file_path, GeoTransform};
use crate::grid::TileGrid;
use crate::raster::{encode_jpeg, MOSAIC_JPEG_QUALITY};

/// A single composite raster and its georeferencing.
#[derive(Debug, Clone)]
pub struct Mosaic {
    image: RgbImage,
    geo_transform: GeoTransform,
}

impl Mosaic {
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn geo_transform(&self) -> &GeoTransform {
        &self.geo_transform
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encodes the raster as JPEG.
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, image::ImageError> {
        encode_jpeg(&self.image, quality)
    }

    /// World-file text for this mosaic.
    pub fn world_file(&self) -> String {
        self.geo_transform.to_world_file()
    }

    /// Writes the mosaic as JPEG (quality [`MOSAIC_JPEG_QUALITY`]) to `path`
    /// and its world file next to it.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        self.save_with_quality(path, MOSAIC_JPEG_QUALITY)
    }

    /// Like [`Mosaic::save`] with an explicit JPEG quality.
    pub fn save_with_quality(&self, path: &Path, quality: u8) -> io::Result<()> {
        let jpeg = self.encode_jpeg(quality).map_err(io::Error::other)?;
        std::fs::write(path, jpeg)?;
        std::fs::write(world_file_path(path), self.world_file())?;
        debug!(
            path = %path.display(),
            width = self.width(),
            height = self.height(),
            quality = quality,
            "Mosaic saved"
        );
        Ok(())
    }
}

/// Assembles every tile of `grid` into one raster.
///
/// The mosaic inherits the GeoTransform of the grid's north-west tile.
///
/// # Errors
///
/// - [`MosaicError::MissingTile`] if a grid index has no tile in `tiles`
/// - [`MosaicError::NotSquare`] / [`MosaicError::TileSizeMismatch`] if the
///   tiles are not all squares of the same size
pub fn assemble(tiles: &TileSet, grid: &TileGrid) -> Result<Mosaic, MosaicError> {
    let top_left = grid.top_left();
    let first = tiles
        .get(&top_left)
        .ok_or(MosaicError::MissingTile(top_left))?;
    let tile_size = first.size();

    for index in grid.iter() {
        let tile = tiles.get(&index).ok_or(MosaicError::MissingTile(index))?;
        let (width, height) = tile.image().dimensions();
        if width != height {
            return Err(MosaicError::NotSquare {
                index,
                width,
                height,
            });
        }
        if width != tile_size {
            return Err(MosaicError::TileSizeMismatch {
                index,
                expected: tile_size,
                actual: width,
            });
        }
    }

    let column_height = grid.height() * tile_size;
    let xs: Vec<u32> = grid.columns().collect();

    // Indexed parallel collect keeps ascending x order
    let columns: Vec<RgbImage> = xs
        .par_iter()
        .map(|&x| {
            let mut column = RgbImage::new(tile_size, column_height);
            for (row, index) in grid.column(x).enumerate() {
                // Presence was checked above
                if let Some(tile) = tiles.get(&index) {
                    imageops::replace(&mut column, tile.image(), 0, row as i64 * tile_size as i64);
                }
            }
            column
        })
        .collect();

    let mut image = RgbImage::new(grid.width() * tile_size, column_height);
    for (i, column) in columns.iter().enumerate() {
        imageops::replace(&mut image, column, i as i64 * tile_size as i64, 0);
    }

    debug!(
        grid = %grid,
        width = image.width(),
        height = image.height(),
        "Mosaic assembled"
    );

    Ok(Mosaic {
        image,
        geo_transform: *first.geo_transform(),
    })
}
