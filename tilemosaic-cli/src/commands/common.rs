//! Common types and utilities shared across CLI commands.

use clap::Args;
use tilemosaic::config::ConfigFile;
use tilemosaic::coord::BoundingBox;
use tilemosaic::orchestrator::ExtractRequest;
use tracing::warn;

use crate::error::CliError;

/// Bounding box corners as given on the command line: west, north, east, south.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BboxArg {
    pub west: f64,
    pub north: f64,
    pub east: f64,
    pub south: f64,
}

impl std::str::FromStr for BboxArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f64> = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| format!("'{}' is not a number", part.trim()))
            })
            .collect::<Result<_, _>>()?;

        match values.as_slice() {
            [west, north, east, south] => Ok(BboxArg {
                west: *west,
                north: *north,
                east: *east,
                south: *south,
            }),
            _ => Err(format!(
                "expected 4 comma-separated values W,N,E,S, found {}",
                values.len()
            )),
        }
    }
}

/// Area and zoom arguments shared by `plan` and `extract`.
#[derive(Debug, Args)]
pub struct AreaArgs {
    /// Bounding box as W,N,E,S in Web-Mercator meters (EPSG:3857)
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: BboxArg,

    /// Interpret --bbox as longitude/latitude degrees instead of meters
    #[arg(long)]
    pub degrees: bool,

    /// Zoom level
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=24))]
    pub zoom: u8,

    /// Maximum number of tiles to download (default from config: 500)
    #[arg(long)]
    pub max_tiles: Option<u64>,

    /// Source serves 256 px tiles instead of 512 px @2x tiles
    #[arg(long)]
    pub low_dpi: bool,
}

impl AreaArgs {
    /// Builds the bounding box from the raw corners.
    pub fn bounding_box(&self) -> Result<BoundingBox, CliError> {
        let BboxArg {
            west,
            north,
            east,
            south,
        } = self.bbox;

        let bbox = if self.degrees {
            BoundingBox::from_degrees(west, north, east, south)
        } else {
            BoundingBox::from_projected(west, north, east, south)
        }
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

        if bbox.exceeds_mercator_limits() {
            warn!(
                north = bbox.north(),
                south = bbox.south(),
                "Bounding box extends past ±85.05°; tiles are clamped to the map edge"
            );
        }
        Ok(bbox)
    }

    /// Builds the extraction request, CLI flags taking precedence over config.
    pub fn to_request(&self, config: &ConfigFile) -> Result<ExtractRequest, CliError> {
        let high_dpi = !self.low_dpi && config.source.high_dpi;
        let max_tiles = self.max_tiles.unwrap_or(config.mosaic.max_tiles);

        Ok(ExtractRequest::new(self.bounding_box()?, self.zoom)
            .with_max_tiles(max_tiles)
            .with_high_dpi(high_dpi)
            .with_concurrency(config.download.concurrency))
    }
}
