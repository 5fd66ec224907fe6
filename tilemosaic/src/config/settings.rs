//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use crate::grid::DEFAULT_MAX_TILES;
use crate::orchestrator::DEFAULT_CONCURRENCY;
use crate::provider::DEFAULT_TIMEOUT_SECS;
use crate::raster::MOSAIC_JPEG_QUALITY;

/// Suffix appended to tile URLs when none is configured.
pub const DEFAULT_SUFFIX: &str = ".png";

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// Tile source settings
    pub source: SourceSettings,
    /// Mosaic output settings
    pub mosaic: MosaicSettings,
    /// Download settings
    pub download: DownloadSettings,
}

/// Tile source configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// Base URL before `/{z}/{x}/{y}`; `None` until configured
    pub url: Option<String>,
    /// Appended after `{y}`, e.g. `@2x.jpg?key=...`
    pub suffix: String,
    /// Whether the source serves 512 px `@2x` tiles
    pub high_dpi: bool,
}

/// Mosaic configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicSettings {
    /// Largest grid an extraction may plan
    pub max_tiles: u64,
    /// JPEG quality of the written mosaic (1-100)
    pub jpeg_quality: u8,
}

/// Download configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSettings {
    /// Timeout in seconds for a single tile request.
    pub timeout: u64,
    /// Maximum number of tile requests in flight.
    pub concurrency: usize,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            url: None,
            suffix: DEFAULT_SUFFIX.to_string(),
            high_dpi: true,
        }
    }
}

impl Default for MosaicSettings {
    fn default() -> Self {
        Self {
            max_tiles: DEFAULT_MAX_TILES,
            jpeg_quality: MOSAIC_JPEG_QUALITY,
        }
    }
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}
