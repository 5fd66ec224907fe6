//! Extraction request, progress hooks and errors

use std::fmt;
use std::time::Duration;

use crate::coord::{BoundingBox, TileIndex};
use crate::fetch::FetchError;
use crate::georef::GeoTransform;
use crate::grid::{GridError, DEFAULT_MAX_TILES};
use crate::mosaic::MosaicError;

/// Default number of tiles fetched at the same time.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Everything one extraction needs to know, fixed for its whole run.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tilemosaic::coord::BoundingBox;
/// use tilemosaic::orchestrator::ExtractRequest;
///
/// let bbox = BoundingBox::from_degrees(2.25, 48.9, 2.42, 48.8).unwrap();
/// let request = ExtractRequest::new(bbox, 14)
///     .with_max_tiles(100)
///     .with_concurrency(8)
///     .with_fetch_timeout(Duration::from_secs(10));
/// assert!(request.high_dpi);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractRequest {
    /// Area to cover
    pub bbox: BoundingBox,
    /// Zoom level of the tiles
    pub zoom: u8,
    /// Upper bound on the planned tile count
    pub max_tiles: u64,
    /// Whether the source serves 512 px `@2x` tiles
    pub high_dpi: bool,
    /// Maximum number of fetches in flight
    pub max_concurrent_fetches: usize,
    /// Per-tile fetch timeout; `None` waits as long as the source does
    pub fetch_timeout: Option<Duration>,
}

impl ExtractRequest {
    /// Request with default limits for a high-dpi source.
    pub fn new(bbox: BoundingBox, zoom: u8) -> Self {
        Self {
            bbox,
            zoom,
            max_tiles: DEFAULT_MAX_TILES,
            high_dpi: true,
            max_concurrent_fetches: DEFAULT_CONCURRENCY,
            fetch_timeout: None,
        }
    }

    pub fn with_max_tiles(mut self, max_tiles: u64) -> Self {
        self.max_tiles = max_tiles;
        self
    }

    pub fn with_high_dpi(mut self, high_dpi: bool) -> Self {
        self.high_dpi = high_dpi;
        self
    }

    /// Sets the fetch concurrency. Zero is treated as one.
    pub fn with_concurrency(mut self, max_concurrent_fetches: usize) -> Self {
        self.max_concurrent_fetches = max_concurrent_fetches.max(1);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }
}

/// Observer for extraction progress.
///
/// Called from the task collecting fetch results, never concurrently.
pub trait ProgressReporter: Send + Sync {
    /// The grid has been planned and `count` tiles will be fetched.
    fn on_planned(&self, _count: u64) {}

    /// `index` was fetched; `done` of `total` tiles are now available.
    fn on_tile_fetched(&self, _index: TileIndex, _done: u64, _total: u64) {}
}

/// Progress reporter that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {}

/// An encoded mosaic ready to be written or sent.
#[derive(Debug, Clone)]
pub struct EncodedMosaic {
    /// JPEG bytes
    pub jpeg: Vec<u8>,
    /// Georeferencing of the raster
    pub geo_transform: GeoTransform,
    pub width: u32,
    pub height: u32,
}

/// Errors that can occur during an extraction.
#[derive(Debug)]
pub enum ExtractError {
    /// The grid could not be planned (typically too many tiles)
    Plan(GridError),
    /// A tile failed; the whole extraction is abandoned
    Fetch(FetchError),
    /// Assembly preconditions were violated
    Assemble(MosaicError),
    /// The caller cancelled the extraction
    Cancelled,
    /// The mosaic could not be encoded
    Encode(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Plan(e) => write!(f, "Planning failed: {}", e),
            ExtractError::Fetch(e) => write!(f, "{}", e),
            ExtractError::Assemble(e) => write!(f, "Assembly failed: {}", e),
            ExtractError::Cancelled => write!(f, "Extraction cancelled"),
            ExtractError::Encode(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::Plan(e) => Some(e),
            ExtractError::Fetch(e) => Some(e),
            ExtractError::Assemble(e) => Some(e),
            ExtractError::Cancelled | ExtractError::Encode(_) => None,
        }
    }
}

impl From<GridError> for ExtractError {
    fn from(e: GridError) -> Self {
        ExtractError::Plan(e)
    }
}

impl From<FetchError> for ExtractError {
    fn from(e: FetchError) -> Self {
        ExtractError::Fetch(e)
    }
}

impl From<MosaicError> for ExtractError {
    fn from(e: MosaicError) -> Self {
        ExtractError::Assemble(e)
    }
}

impl From<image::ImageError> for ExtractError {
    fn from(e: image::ImageError) -> Self {
        ExtractError::Encode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BoundingBox {
        BoundingBox::from_degrees(-1.0, 1.0, 1.0, -1.0).unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let request = ExtractRequest::new(bbox(), 12);
        assert_eq!(request.max_tiles, DEFAULT_MAX_TILES);
        assert_eq!(request.max_concurrent_fetches, DEFAULT_CONCURRENCY);
        assert!(request.high_dpi);
        assert!(request.fetch_timeout.is_none());
    }

    #[test]
    fn test_zero_concurrency_becomes_one() {
        let request = ExtractRequest::new(bbox(), 12).with_concurrency(0);
        assert_eq!(request.max_concurrent_fetches, 1);
    }

    #[test]
    fn test_plan_error_display() {
        let err = ExtractError::from(GridError::TooManyTiles {
            count: 501,
            max: 500,
        });
        assert!(err.to_string().contains("501"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
