//! Per-tile fetching and georeferencing.
//!
//! [`fetch_tile`] obtains the raw bytes of one tile from a [`TileSource`],
//! normalizes them into an RGB raster and attaches the tile's
//! [`GeoTransform`]. There is no retry here: retry policy, if any, belongs to
//! the source.

mod types;

pub use types::{FetchError, Tile};

use tracing::{debug, trace};

use crate::coord::TileIndex;
use crate::georef::{tile_size, GeoTransform};
use crate::provider::TileSource;
use crate::raster::normalize_tile;

/// Fetches, normalizes and georeferences a single tile.
///
/// # Arguments
///
/// * `source` - Capability providing the raw tile bytes
/// * `index` - Tile to fetch
/// * `high_dpi` - Whether the source serves 512 px `@2x` tiles rather than
///   256 px tiles (halves the pixel size)
///
/// # Errors
///
/// Every failure carries `index`:
/// - [`FetchError::Source`] if the source could not deliver the bytes
/// - [`FetchError::Decode`] if the bytes are not a decodable image
/// - [`FetchError::NotSquare`] if the decoded raster is not square
/// - [`FetchError::UnexpectedSize`] if its side is not [`tile_size`]`(high_dpi)`
pub async fn fetch_tile<S: TileSource>(
    source: &S,
    index: TileIndex,
    high_dpi: bool,
) -> Result<Tile, FetchError> {
    trace!(tile = %index, source = source.name(), "Fetching tile");

    let raw = source
        .fetch_tile(index.zoom, index.x, index.y)
        .await
        .map_err(|source| FetchError::Source { index, source })?;
    let raw_len = raw.len();

    // Decoding and re-encoding is CPU bound, keep it off the async workers
    let (jpeg, image) = tokio::task::spawn_blocking(move || normalize_tile(&raw))
        .await
        .map_err(|e| FetchError::Decode {
            index,
            message: format!("decode task failed: {}", e),
        })?
        .map_err(|e| FetchError::Decode {
            index,
            message: e.to_string(),
        })?;

    let (width, height) = image.dimensions();
    if width != height || width == 0 {
        return Err(FetchError::NotSquare {
            index,
            width,
            height,
        });
    }

    let expected = tile_size(high_dpi);
    if width != expected {
        return Err(FetchError::UnexpectedSize {
            index,
            expected,
            actual: width,
        });
    }

    let geo_transform = GeoTransform::for_tile(&index, high_dpi);
    debug!(
        tile = %index,
        bytes = raw_len,
        size = width,
        resolution = geo_transform.pixel_width,
        "Tile fetched"
    );

    Ok(Tile::new(index, jpeg, image, geo_transform))
}
