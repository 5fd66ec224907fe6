//! Tile grid planning.
//!
//! Turns a geographic [`BoundingBox`] and a zoom level into the inclusive
//! rectangle of tile indices covering it, and enforces the maximum tile count
//! policy before anything is downloaded.

use std::fmt;

use crate::coord::{to_tile_index, BoundingBox, TileIndex, MAX_ZOOM};

/// Default cap on the number of tiles a single extraction may request.
pub const DEFAULT_MAX_TILES: u64 = 500;

/// Errors that can occur while planning a tile grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The planned grid needs more tiles than allowed
    TooManyTiles { count: u64, max: u64 },
    /// Grid bounds are inverted or outside the zoom level's tile range
    InvalidRange {
        zoom: u8,
        x_min: u32,
        x_max: u32,
        y_min: u32,
        y_max: u32,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::TooManyTiles { count, max } => write!(
                f,
                "Number of tiles to download ({}) exceeds the limit of {}",
                count, max
            ),
            GridError::InvalidRange {
                zoom,
                x_min,
                x_max,
                y_min,
                y_max,
            } => write!(
                f,
                "Invalid tile range at zoom {}: x {}..={}, y {}..={}",
                zoom, x_min, x_max, y_min, y_max
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Inclusive rectangle of tiles at one zoom level.
///
/// `y` increases southward, so `y_min` is the northern row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileGrid {
    zoom: u8,
    x_min: u32,
    x_max: u32,
    y_min: u32,
    y_max: u32,
}

impl TileGrid {
    /// Creates a grid from explicit bounds.
    ///
    /// Bounds must be ordered and lie within `0..2^zoom`.
    pub fn new(zoom: u8, x_min: u32, x_max: u32, y_min: u32, y_max: u32) -> Result<Self, GridError> {
        let invalid = || GridError::InvalidRange {
            zoom,
            x_min,
            x_max,
            y_min,
            y_max,
        };

        if zoom > MAX_ZOOM || x_min > x_max || y_min > y_max {
            return Err(invalid());
        }
        let n = 1u32 << zoom;
        if x_max >= n || y_max >= n {
            return Err(invalid());
        }

        Ok(Self {
            zoom,
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn x_min(&self) -> u32 {
        self.x_min
    }

    pub fn x_max(&self) -> u32 {
        self.x_max
    }

    pub fn y_min(&self) -> u32 {
        self.y_min
    }

    pub fn y_max(&self) -> u32 {
        self.y_max
    }

    /// Number of tile columns.
    pub fn width(&self) -> u32 {
        self.x_max - self.x_min + 1
    }

    /// Number of tile rows.
    pub fn height(&self) -> u32 {
        self.y_max - self.y_min + 1
    }

    /// Total number of tiles, `width * height`.
    pub fn tile_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// The north-west tile of the grid.
    pub fn top_left(&self) -> TileIndex {
        TileIndex::new(self.zoom, self.x_min, self.y_min)
    }

    /// Returns true if `index` is part of this grid.
    pub fn contains(&self, index: &TileIndex) -> bool {
        index.zoom == self.zoom
            && (self.x_min..=self.x_max).contains(&index.x)
            && (self.y_min..=self.y_max).contains(&index.y)
    }

    /// Column x values, west to east.
    pub fn columns(&self) -> std::ops::RangeInclusive<u32> {
        self.x_min..=self.x_max
    }

    /// Row y values, north to south.
    pub fn rows(&self) -> std::ops::RangeInclusive<u32> {
        self.y_min..=self.y_max
    }

    /// Tiles of one column, north to south.
    pub fn column(&self, x: u32) -> impl Iterator<Item = TileIndex> + '_ {
        self.rows().map(move |y| TileIndex::new(self.zoom, x, y))
    }

    /// All tiles in column-major order: x ascending, then y ascending.
    pub fn iter(&self) -> impl Iterator<Item = TileIndex> + '_ {
        self.columns().flat_map(move |x| self.column(x))
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "z{} x {}..={} y {}..={} ({}×{} tiles)",
            self.zoom,
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max,
            self.width(),
            self.height()
        )
    }
}

/// Plans the tile grid covering `bbox` at `zoom`.
///
/// The border tiles are those containing the north-west and south-east
/// corners of the box. If the resulting grid holds more than `max_tiles`
/// tiles, no grid is returned.
///
/// # Errors
///
/// Returns [`GridError::TooManyTiles`] carrying the computed count when the
/// cap is exceeded, and [`GridError::InvalidRange`] for a zoom above
/// [`MAX_ZOOM`].
pub fn plan_grid(bbox: &BoundingBox, zoom: u8, max_tiles: u64) -> Result<TileGrid, GridError> {
    if zoom > MAX_ZOOM {
        return Err(GridError::InvalidRange {
            zoom,
            x_min: 0,
            x_max: 0,
            y_min: 0,
            y_max: 0,
        });
    }

    let north_west = to_tile_index(bbox.north(), bbox.west(), zoom);
    let south_east = to_tile_index(bbox.south(), bbox.east(), zoom);

    let grid = TileGrid::new(
        zoom,
        north_west.x,
        south_east.x,
        north_west.y,
        south_east.y,
    )?;

    let count = grid.tile_count();
    tracing::debug!(
        zoom = zoom,
        x_min = grid.x_min,
        x_max = grid.x_max,
        y_min = grid.y_min,
        y_max = grid.y_max,
        count = count,
        "Planned tile grid"
    );

    if count > max_tiles {
        return Err(GridError::TooManyTiles {
            count,
            max: max_tiles,
        });
    }

    Ok(grid)
}
