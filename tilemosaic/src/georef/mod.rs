//! Georeferencing for tiles and mosaics.
//!
//! A [`GeoTransform`] is the six-parameter affine mapping pixel positions to
//! Web Mercator meters. It is written next to rasters as a world file
//! (`.jgw` for JPEG), six lines:
//!
//! ```text
//! pixel width
//! row rotation        (always 0)
//! column rotation     (always 0)
//! -pixel height
//! x of the top-left pixel centre
//! y of the top-left pixel centre
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::coord::{tile_index_to_projected, TileIndex};

/// Pixel size in meters of a 512 px tile at zoom 0.
pub const BASE_RESOLUTION: f64 = 78271.515;

/// Edge length of tiles served by high-dpi (`@2x`) sources.
pub const HIGH_DPI_TILE_SIZE: u32 = 512;

/// Edge length of standard tiles.
pub const STANDARD_TILE_SIZE: u32 = 256;

/// Number of fraction digits kept in resolutions and world files.
const FRACTION_DIGITS: i32 = 4;

/// Errors raised while reading georeferencing data.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoRefError {
    /// World file text is malformed
    InvalidWorldFile(String),
}

impl fmt::Display for GeoRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoRefError::InvalidWorldFile(msg) => write!(f, "Invalid world file: {}", msg),
        }
    }
}

impl std::error::Error for GeoRefError {}

fn round_fraction(value: f64) -> f64 {
    let scale = 10.0_f64.powi(FRACTION_DIGITS);
    (value * scale).round() / scale
}

/// Meters per pixel at `zoom`, rounded to four fraction digits.
///
/// High-dpi sources deliver twice the pixels over the same ground area, so
/// their pixel size is half that of standard tiles.
pub fn resolution(zoom: u8, high_dpi: bool) -> f64 {
    let base = BASE_RESOLUTION / 2.0_f64.powi(zoom as i32);
    if high_dpi {
        round_fraction(base)
    } else {
        round_fraction(base * 2.0)
    }
}

/// Expected tile edge length in pixels.
pub fn tile_size(high_dpi: bool) -> u32 {
    if high_dpi {
        HIGH_DPI_TILE_SIZE
    } else {
        STANDARD_TILE_SIZE
    }
}

/// Six-parameter affine transform from pixel to projected coordinates.
///
/// Origin values refer to the centre of the top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub column_rotation: f64,
    pub pixel_height: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl GeoTransform {
    /// North-up transform with square pixels of `resolution` meters.
    pub fn north_up(resolution: f64, origin_x: f64, origin_y: f64) -> Self {
        Self {
            pixel_width: resolution,
            row_rotation: 0.0,
            column_rotation: 0.0,
            pixel_height: -resolution,
            origin_x,
            origin_y,
        }
    }

    /// Georeferencing of a single tile.
    ///
    /// The tile's north-west corner is shifted by half a pixel east and
    /// south to land on the centre of the first pixel.
    pub fn for_tile(index: &TileIndex, high_dpi: bool) -> Self {
        let res = resolution(index.zoom, high_dpi);
        let (corner_x, corner_y) = tile_index_to_projected(index.x, index.y, index.zoom);
        Self::north_up(res, corner_x + res / 2.0, corner_y - res / 2.0)
    }

    /// Projected coordinate of the centre of pixel (`col`, `row`).
    pub fn pixel_to_projected(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.column_rotation;
        let y = self.origin_y + col * self.row_rotation + row * self.pixel_height;
        (x, y)
    }

    /// The six parameters in world-file order.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.pixel_width,
            self.row_rotation,
            self.column_rotation,
            self.pixel_height,
            self.origin_x,
            self.origin_y,
        ]
    }

    /// Renders the transform as world-file text.
    pub fn to_world_file(&self) -> String {
        let mut out = String::with_capacity(96);
        for value in self.to_array() {
            // Avoid "-0.0000" for zero rotations
            let value = if value == 0.0 { 0.0 } else { value };
            out.push_str(&format!("{:.*}\n", FRACTION_DIGITS as usize, value));
        }
        out
    }

    /// Parses world-file text.
    pub fn from_world_file(text: &str) -> Result<Self, GeoRefError> {
        let values: Vec<f64> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.parse::<f64>().map_err(|_| {
                    GeoRefError::InvalidWorldFile(format!("not a number: '{}'", line))
                })
            })
            .collect::<Result<_, _>>()?;

        if values.len() != 6 {
            return Err(GeoRefError::InvalidWorldFile(format!(
                "expected 6 values, found {}",
                values.len()
            )));
        }

        Ok(Self {
            pixel_width: values[0],
            row_rotation: values[1],
            column_rotation: values[2],
            pixel_height: values[3],
            origin_x: values[4],
            origin_y: values[5],
        })
    }
}

/// Sidecar path for a raster: `mosaic.jpg` becomes `mosaic.jgw`.
///
/// Follows the usual convention of first and last extension letter plus `w`.
pub fn world_file_path(raster: &Path) -> PathBuf {
    let ext = raster
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let mut chars = ext.chars();
    let sidecar = match (chars.next(), chars.last()) {
        (Some(first), Some(last)) => format!("{}{}w", first, last),
        _ => "wld".to_string(),
    };
    raster.with_extension(sidecar)
}
