//! Integration tests for the extraction pipeline.
//!
//! These tests drive plan → fetch → assemble end to end with an in-memory
//! tile source:
//! - every tile lands at its grid position in the mosaic
//! - the mosaic and its world file are written together
//! - tiles can be written individually instead of mosaicked
//!
//! Run with: `cargo test --test extract_pipeline`

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{Rgb, RgbImage};
use tokio_util::sync::CancellationToken;

use tilemosaic::coord::{geographic_to_projected, BoundingBox, TileIndex};
use tilemosaic::fetch::FetchError;
use tilemosaic::georef::{resolution, GeoTransform, STANDARD_TILE_SIZE};
use tilemosaic::orchestrator::{ExtractError, ExtractRequest, MosaicOrchestrator, NoOpProgress};
use tilemosaic::provider::{FnTileSource, ProviderError};

// ============================================================================
// Helper Functions
// ============================================================================

const TILE_SIZE: u32 = STANDARD_TILE_SIZE;

/// Colour identifying a tile by its position.
fn tile_colour(x: u32, y: u32) -> Rgb<u8> {
    Rgb([((x % 4) * 60) as u8, ((y % 4) * 60) as u8, 128])
}

fn encoded_tile(x: u32, y: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(TILE_SIZE, TILE_SIZE, tile_colour(x, y));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn colour_source() -> FnTileSource<impl Fn(u8, u32, u32) -> std::future::Ready<Result<Vec<u8>, ProviderError>> + Send + Sync>
{
    FnTileSource::new("colours", |_zoom: u8, x: u32, y: u32| {
        std::future::ready(Ok(encoded_tile(x, y)))
    })
}

/// Projected bbox spanning tiles x 8..=10, y 8..=10 at zoom 4.
fn three_by_three() -> BoundingBox {
    let (west, north) = geographic_to_projected(-1.0, 1.0);
    let (east, south) = geographic_to_projected(-55.0, 66.0);
    BoundingBox::from_projected(west, north, east, south).unwrap()
}

/// Extraction of the 3×3 block from a 256 px source.
fn standard_request() -> ExtractRequest {
    ExtractRequest::new(three_by_three(), 4).with_high_dpi(false)
}

fn close(a: Rgb<u8>, b: Rgb<u8>) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .all(|(p, q)| (*p as i16 - *q as i16).abs() <= 6)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_mosaic_places_every_tile() {
    let orchestrator = MosaicOrchestrator::new(colour_source());
    let request = standard_request();

    let grid = orchestrator.plan(&request).unwrap();
    assert_eq!(grid.tile_count(), 9);

    let mosaic = orchestrator.extract(&request).await.unwrap();
    assert_eq!(mosaic.width(), 3 * TILE_SIZE);
    assert_eq!(mosaic.height(), 3 * TILE_SIZE);

    for (col, x) in grid.columns().enumerate() {
        for (row, y) in grid.rows().enumerate() {
            let px = col as u32 * TILE_SIZE + TILE_SIZE / 2;
            let py = row as u32 * TILE_SIZE + TILE_SIZE / 2;
            let got = *mosaic.image().get_pixel(px, py);
            assert!(
                close(got, tile_colour(x, y)),
                "tile ({}, {}) expected {:?}, got {:?}",
                x,
                y,
                tile_colour(x, y),
                got
            );
        }
    }
}

#[tokio::test]
async fn test_mosaic_georeference() {
    let orchestrator = MosaicOrchestrator::new(colour_source());
    let request = standard_request();

    let mosaic = orchestrator.extract(&request).await.unwrap();
    let expected = GeoTransform::for_tile(&TileIndex::new(4, 8, 8), false);
    assert_eq!(*mosaic.geo_transform(), expected);
    assert_eq!(mosaic.geo_transform().pixel_width, resolution(4, false));
}

#[tokio::test]
async fn test_save_mosaic_with_world_file() {
    let orchestrator = MosaicOrchestrator::new(colour_source());
    let request = standard_request();
    let mosaic = orchestrator.extract(&request).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basemap.jpg");
    mosaic.save(&path).unwrap();

    let decoded = image::open(&path).unwrap();
    assert_eq!(decoded.width(), mosaic.width());

    let world = std::fs::read_to_string(dir.path().join("basemap.jgw")).unwrap();
    let parsed = GeoTransform::from_world_file(&world).unwrap();
    assert_eq!(parsed.pixel_width, resolution(4, false));
    assert_eq!(parsed.pixel_height, -resolution(4, false));
}

#[tokio::test]
async fn test_tiles_only_mode() {
    let orchestrator = MosaicOrchestrator::new(colour_source());
    let request = standard_request();

    let (grid, tiles) = orchestrator
        .fetch_tiles(&request, &CancellationToken::new(), &NoOpProgress)
        .await
        .unwrap();
    assert_eq!(tiles.len() as u64, grid.tile_count());

    let dir = tempfile::tempdir().unwrap();
    for tile in tiles.iter() {
        tile.save(dir.path()).unwrap();
    }

    for index in grid.iter() {
        let stem = format!("{}_{}", index.x, index.y);
        assert!(dir.path().join(format!("{}.jpg", stem)).exists());
        assert!(dir.path().join(format!("{}.jgw", stem)).exists());
    }

    // Written bytes are the normalized JPEG, not a second encoding of it
    for tile in tiles.iter() {
        let written = std::fs::read(dir.path().join(tile.file_name())).unwrap();
        assert_eq!(written, tile.jpeg());
    }
}

#[tokio::test]
async fn test_standard_source_rejected_as_high_dpi() {
    let orchestrator = MosaicOrchestrator::new(colour_source());
    let high_dpi = ExtractRequest::new(three_by_three(), 4).with_high_dpi(true);

    let err = orchestrator.extract(&high_dpi).await.unwrap_err();
    match err {
        ExtractError::Fetch(FetchError::UnexpectedSize {
            expected, actual, ..
        }) => assert_eq!((expected, actual), (512, TILE_SIZE)),
        other => panic!("expected size mismatch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_one_bad_tile_fails_whole_extraction() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let source = FnTileSource::new("one-bad", move |_zoom: u8, x: u32, y: u32| {
        counter.fetch_add(1, Ordering::SeqCst);
        let result = if (x, y) == (10, 10) {
            Err(ProviderError::HttpError("HTTP 404".to_string()))
        } else {
            Ok(encoded_tile(x, y))
        };
        std::future::ready(result)
    });

    let orchestrator = MosaicOrchestrator::new(source);
    let err = orchestrator
        .extract(&standard_request())
        .await
        .unwrap_err();

    match err {
        ExtractError::Fetch(e) => assert_eq!(e.index(), TileIndex::new(4, 10, 10)),
        other => panic!("expected fetch error, got {:?}", other),
    }
    assert!(calls.load(Ordering::SeqCst) <= 9);
}
