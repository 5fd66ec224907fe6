//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (WGS84 latitude/longitude),
//! projected Web Mercator coordinates (EPSG:3857, meters) and slippy-map tile
//! indices.
//!
//! # Limitations
//!
//! All formulas assume the Web Mercator latitude band of ±85.05112878°.
//! Outside that band the results are undefined: no error is raised, and tile
//! indices are clamped into the grid rather than guessed at.

mod types;

pub use types::{BoundingBox, CoordError, TileIndex, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON};

use std::f64::consts::PI;

/// Radius of the spherical Web Mercator earth model, in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the width of the projected world, in meters.
pub const ORIGIN_SHIFT: f64 = PI * EARTH_RADIUS;

/// Converts Web Mercator meters to geographic degrees.
///
/// # Returns
///
/// `(lat, lon)` in degrees.
#[inline]
pub fn projected_to_geographic(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (y / EARTH_RADIUS).sinh().atan().to_degrees();
    (lat, lon)
}

/// Converts geographic degrees to Web Mercator meters.
///
/// # Returns
///
/// `(x, y)` in meters.
#[inline]
pub fn geographic_to_projected(lat: f64, lon: f64) -> (f64, f64) {
    let x = lon.to_radians() * EARTH_RADIUS;
    let y = lat.to_radians().tan().asinh() * EARTH_RADIUS;
    (x, y)
}

/// Converts geographic coordinates to the index of the tile containing them.
///
/// Uses the standard slippy-map formula and truncates toward zero. A point
/// exactly on a tile boundary belongs to the tile east/south of it. Indices
/// are clamped to `2^zoom - 1` so the eastern edge (lon = 180) and the
/// southern Mercator limit stay inside the grid.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level
#[inline]
pub fn to_tile_index(lat: f64, lon: f64, zoom: u8) -> TileIndex {
    let n = 2.0_f64.powi(zoom as i32);
    // Saturates at u32::MAX for zoom >= 32
    let max_index = ((1u64 << zoom.min(32)) - 1) as u32;

    // Convert longitude to tile X coordinate
    let x = ((lon + 180.0) / 360.0 * n) as u32;

    // Convert latitude to tile Y coordinate using Web Mercator projection
    let lat_rad = lat.to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n) as u32;

    TileIndex {
        zoom,
        x: x.min(max_index),
        y: y.min(max_index),
    }
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileIndex) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.x as f64 / n * 360.0 - 180.0;

    // Inverse Web Mercator
    let y = tile.y as f64 / n;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();

    (lat, lon)
}

/// Returns the projected (EPSG:3857) coordinate of a tile's northwest corner.
///
/// This is the inverse of [`to_tile_index`] composed with
/// [`geographic_to_projected`] and anchors per-tile georeferencing.
#[inline]
pub fn tile_index_to_projected(x: u32, y: u32, zoom: u8) -> (f64, f64) {
    let (lat, lon) = tile_to_lat_lon(&TileIndex { zoom, x, y });
    geographic_to_projected(lat, lon)
}

/// Width (and height) of one tile at `zoom`, in projected meters.
#[inline]
pub fn tile_size_meters(zoom: u8) -> f64 {
    2.0 * ORIGIN_SHIFT / 2.0_f64.powi(zoom as i32)
}
