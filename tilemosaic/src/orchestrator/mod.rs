//! Extraction pipeline
//!
//! Plans the tile grid for a request, fetches every tile with bounded
//! concurrency and assembles the mosaic once all tiles are in.
//!
//! Fetching is fail-fast: the first tile error cancels the remaining fetches
//! and is returned as is. No partial mosaic is ever produced.
//!
//! ```ignore
//! use tilemosaic::orchestrator::{ExtractRequest, MosaicOrchestrator};
//! use tilemosaic::provider::{AsyncReqwestClient, XyzTileSource};
//!
//! let source = XyzTileSource::new(AsyncReqwestClient::new()?, "https://tiles.example.com", "@2x.jpg");
//! let orchestrator = MosaicOrchestrator::new(source);
//! let mosaic = orchestrator.extract(&ExtractRequest::new(bbox, 15)).await?;
//! ```

mod types;

pub use types::{
    EncodedMosaic, ExtractError, ExtractRequest, NoOpProgress, ProgressReporter,
    DEFAULT_CONCURRENCY,
};

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::coord::TileIndex;
use crate::fetch::{fetch_tile, FetchError, Tile};
use crate::grid::{plan_grid, TileGrid};
use crate::mosaic::{assemble, Mosaic, TileSet};
use crate::provider::TileSource;
use crate::raster::MOSAIC_JPEG_QUALITY;

/// Upper bound on the slots reserved up front for fetched tiles.
const TILE_SET_CAPACITY_HINT: u64 = 4096;

/// Runs extractions against one tile source.
///
/// Holds no per-request state; one orchestrator can serve any number of
/// concurrent extractions.
pub struct MosaicOrchestrator<S> {
    source: Arc<S>,
}

impl<S> Clone for MosaicOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: TileSource + 'static> MosaicOrchestrator<S> {
    pub fn new(source: S) -> Self {
        Self::from_arc(Arc::new(source))
    }

    /// Builds an orchestrator around an already shared source.
    pub fn from_arc(source: Arc<S>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Plans the grid for `request` without fetching anything.
    pub fn plan(&self, request: &ExtractRequest) -> Result<TileGrid, ExtractError> {
        Ok(plan_grid(&request.bbox, request.zoom, request.max_tiles)?)
    }

    /// Extracts the mosaic for `request`.
    pub async fn extract(&self, request: &ExtractRequest) -> Result<Mosaic, ExtractError> {
        self.extract_with_cancellation(request, CancellationToken::new())
            .await
    }

    /// Extracts the mosaic for `request`, stopping early when `cancellation`
    /// fires.
    pub async fn extract_with_cancellation(
        &self,
        request: &ExtractRequest,
        cancellation: CancellationToken,
    ) -> Result<Mosaic, ExtractError> {
        self.extract_with_progress(request, cancellation, &NoOpProgress)
            .await
    }

    /// Full extraction: plan, fetch, assemble.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::Plan`] if the grid exceeds `request.max_tiles`
    /// - [`ExtractError::Fetch`] with the first tile that failed
    /// - [`ExtractError::Cancelled`] if `cancellation` fired
    pub async fn extract_with_progress(
        &self,
        request: &ExtractRequest,
        cancellation: CancellationToken,
        progress: &dyn ProgressReporter,
    ) -> Result<Mosaic, ExtractError> {
        let start = Instant::now();
        let (grid, tiles) = self.fetch_tiles(request, &cancellation, progress).await?;

        let mosaic = tokio::task::spawn_blocking(move || assemble(&tiles, &grid))
            .await
            .map_err(join_failure)??;

        info!(
            width = mosaic.width(),
            height = mosaic.height(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Extraction complete"
        );
        Ok(mosaic)
    }

    /// Extracts the mosaic and encodes it as JPEG at
    /// [`MOSAIC_JPEG_QUALITY`].
    pub async fn extract_encoded(
        &self,
        request: &ExtractRequest,
        cancellation: CancellationToken,
        progress: &dyn ProgressReporter,
    ) -> Result<EncodedMosaic, ExtractError> {
        let mosaic = self
            .extract_with_progress(request, cancellation, progress)
            .await?;

        tokio::task::spawn_blocking(move || -> Result<EncodedMosaic, ExtractError> {
            let jpeg = mosaic.encode_jpeg(MOSAIC_JPEG_QUALITY)?;
            Ok(EncodedMosaic {
                jpeg,
                geo_transform: *mosaic.geo_transform(),
                width: mosaic.width(),
                height: mosaic.height(),
            })
        })
        .await
        .map_err(join_failure)?
    }

    /// Plans the grid and fetches all of its tiles without assembling them.
    ///
    /// At most `request.max_concurrent_fetches` fetches are in flight. The
    /// first failure cancels every outstanding fetch and is returned; tiles
    /// fetched so far are dropped.
    pub async fn fetch_tiles(
        &self,
        request: &ExtractRequest,
        cancellation: &CancellationToken,
        progress: &dyn ProgressReporter,
    ) -> Result<(TileGrid, TileSet), ExtractError> {
        let grid = self.plan(request)?;
        let total = grid.tile_count();
        progress.on_planned(total);

        info!(
            grid = %grid,
            tiles = total,
            source = self.source.name(),
            concurrency = request.max_concurrent_fetches,
            "Fetching tiles"
        );

        if cancellation.is_cancelled() {
            return Err(ExtractError::Cancelled);
        }

        // Child token so fail-fast never cancels the caller's token
        let abort = cancellation.child_token();
        let semaphore = Arc::new(Semaphore::new(request.max_concurrent_fetches.max(1)));
        let mut tasks = JoinSet::new();

        for index in grid.iter() {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let abort = abort.clone();
            let high_dpi = request.high_dpi;
            let timeout = request.fetch_timeout;

            tasks.spawn(async move {
                tokio::select! {
                    result = fetch_one(source, semaphore, index, high_dpi, timeout) => Some(result),
                    _ = abort.cancelled() => None,
                }
            });
        }

        let mut tiles = TileSet::with_capacity(capacity_hint(total));
        loop {
            let joined = tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    tasks.abort_all();
                    debug!("Extraction cancelled by caller");
                    return Err(ExtractError::Cancelled);
                }
                joined = tasks.join_next() => joined,
            };

            let Some(joined) = joined else { break };
            match joined.map_err(join_failure)? {
                Some(Ok(tile)) => {
                    let index = tile.index();
                    store(&mut tiles, tile);
                    progress.on_tile_fetched(index, tiles.len() as u64, total);
                }
                Some(Err(e)) => {
                    warn!(tile = %e.index(), error = %e, "Tile fetch failed, aborting extraction");
                    abort.cancel();
                    tasks.abort_all();
                    return Err(ExtractError::Fetch(e));
                }
                // Stopped by the abort token
                None => {}
            }
        }

        if cancellation.is_cancelled() || (tiles.len() as u64) < total {
            return Err(ExtractError::Cancelled);
        }

        debug!(tiles = tiles.len(), "All tiles fetched");
        Ok((grid, tiles))
    }
}

/// Fetches one tile once a fetch slot is free.
async fn fetch_one<S: TileSource>(
    source: Arc<S>,
    semaphore: Arc<Semaphore>,
    index: TileIndex,
    high_dpi: bool,
    timeout: Option<Duration>,
) -> Result<Tile, FetchError> {
    // The semaphore is never closed
    let _permit = semaphore.acquire_owned().await.ok();

    let fetch = fetch_tile(source.as_ref(), index, high_dpi);
    match timeout {
        Some(after) => tokio::time::timeout(after, fetch)
            .await
            .unwrap_or(Err(FetchError::Timeout { index, after })),
        None => fetch.await,
    }
}

/// Slots to reserve for a grid of `total` tiles.
fn capacity_hint(total: u64) -> usize {
    total.min(TILE_SET_CAPACITY_HINT) as usize
}

fn store(tiles: &mut TileSet, tile: Tile) {
    if let Err(duplicate) = tiles.insert(tile) {
        warn!(tile = %duplicate.index(), "Tile fetched twice, keeping the first copy");
    }
}

/// Maps a failed task join: panics are re-raised, aborts mean cancellation.
fn join_failure(e: JoinError) -> ExtractError {
    if e.is_panic() {
        std::panic::resume_unwind(e.into_panic());
    }
    ExtractError::Cancelled
}
