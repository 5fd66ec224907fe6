//! TileMosaic - Georeferenced basemap extraction from slippy-map tile servers
//!
//! This library computes the tiles covering a bounding box at a given zoom
//! level, fetches them concurrently from an XYZ tile source and stitches them
//! into a single mosaic with a world-file GeoTransform.
//!
//! Pipeline: [`grid::plan_grid`] → [`fetch::fetch_tile`] (per tile) →
//! [`mosaic::assemble`], driven by [`orchestrator::MosaicOrchestrator`].

pub mod config;
pub mod coord;
pub mod fetch;
pub mod georef;
pub mod grid;
pub mod logging;
pub mod mosaic;
pub mod orchestrator;
pub mod provider;
pub mod raster;

/// Library version, from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
