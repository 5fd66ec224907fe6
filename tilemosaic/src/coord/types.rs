//! Coordinate type definitions

use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Highest zoom level the tile math is exercised at.
pub const MAX_ZOOM: u8 = 24;

/// Tile index in the Web Mercator / Slippy Map grid.
///
/// Tile (0, 0) is the north-west corner of the world at every zoom level.
/// `x` grows eastward, `y` grows southward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileIndex {
    /// Zoom level
    pub zoom: u8,
    /// X coordinate (west to east), 0 at the antimeridian
    pub x: u32,
    /// Y coordinate (north to south), 0 at the northern Mercator limit
    pub y: u32,
}

impl TileIndex {
    /// Creates a tile index.
    pub fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// Number of tiles along one axis at this index's zoom level.
    #[inline]
    pub fn tiles_per_axis(&self) -> u32 {
        1u32 << self.zoom
    }

    /// Returns true if `x` and `y` lie inside the grid for this zoom.
    pub fn is_valid(&self) -> bool {
        self.zoom <= MAX_ZOOM && self.x < self.tiles_per_axis() && self.y < self.tiles_per_axis()
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Geographic bounding box in WGS84 degrees.
///
/// Immutable once built. Corners are normalized so that `north > south`
/// and `east > west`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl BoundingBox {
    /// Builds a bounding box from geographic degrees.
    ///
    /// Swapped corners are normalized. Degenerate (zero-area) or non-finite
    /// boxes are rejected.
    pub fn from_degrees(west: f64, north: f64, east: f64, south: f64) -> Result<Self, CoordError> {
        let values = [west, north, east, south];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(CoordError::InvalidBounds(format!(
                "non-finite coordinate in ({}, {}, {}, {})",
                west, north, east, south
            )));
        }

        let (west, east) = (west.min(east), west.max(east));
        let (south, north) = (south.min(north), south.max(north));

        if west == east || south == north {
            return Err(CoordError::InvalidBounds(format!(
                "degenerate box: west={} east={} south={} north={}",
                west, east, south, north
            )));
        }

        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    /// Builds a bounding box from EPSG:3857 coordinates given as
    /// `(west, north, east, south)` in meters.
    ///
    /// The projected corners are converted to geographic degrees once, here.
    pub fn from_projected(west: f64, north: f64, east: f64, south: f64) -> Result<Self, CoordError> {
        let (north_lat, west_lon) = super::projected_to_geographic(west, north);
        let (south_lat, east_lon) = super::projected_to_geographic(east, south);
        Self::from_degrees(west_lon, north_lat, east_lon, south_lat)
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    /// Returns true if any edge lies outside the Web Mercator latitude band.
    ///
    /// Tile math beyond ±85.05° is not defined; callers may want to warn.
    pub fn exceeds_mercator_limits(&self) -> bool {
        self.north > MAX_LAT || self.south < MIN_LAT
    }
}

/// Errors that can occur during coordinate handling.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Bounding box is degenerate or contains non-finite values
    InvalidBounds(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidBounds(msg) => write!(f, "Invalid bounding box: {}", msg),
        }
    }
}

impl std::error::Error for CoordError {}
