//! Configuration key access and validation.
//!
//! Lets the CLI get and set values by `section.key` name with the same
//! validation the file parser applies.

use std::str::FromStr;

use thiserror::Error;

use super::parser::{parse_bool, parse_positive, parse_quality, parse_url};
use super::settings::ConfigFile;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    SourceUrl,
    SourceSuffix,
    SourceHighDpi,
    MosaicMaxTiles,
    MosaicJpegQuality,
    DownloadTimeout,
    DownloadConcurrency,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s.to_lowercase())
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical key name (e.g., "source.url").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::SourceUrl => "source.url",
            ConfigKey::SourceSuffix => "source.suffix",
            ConfigKey::SourceHighDpi => "source.high_dpi",
            ConfigKey::MosaicMaxTiles => "mosaic.max_tiles",
            ConfigKey::MosaicJpegQuality => "mosaic.jpeg_quality",
            ConfigKey::DownloadTimeout => "download.timeout",
            ConfigKey::DownloadConcurrency => "download.concurrency",
        }
    }

    /// Get the section name (e.g., "source").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "url").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::SourceUrl => config.source.url.clone().unwrap_or_default(),
            ConfigKey::SourceSuffix => config.source.suffix.clone(),
            ConfigKey::SourceHighDpi => config.source.high_dpi.to_string(),
            ConfigKey::MosaicMaxTiles => config.mosaic.max_tiles.to_string(),
            ConfigKey::MosaicJpegQuality => config.mosaic.jpeg_quality.to_string(),
            ConfigKey::DownloadTimeout => config.download.timeout.to_string(),
            ConfigKey::DownloadConcurrency => config.download.concurrency.to_string(),
        }
    }

    /// Set the value in a config file.
    ///
    /// The config is left untouched if the value is invalid.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let failed = |reason: String| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason,
        };

        match self {
            ConfigKey::SourceUrl => config.source.url = parse_url(value).map_err(failed)?,
            ConfigKey::SourceSuffix => config.source.suffix = value.trim().to_string(),
            ConfigKey::SourceHighDpi => config.source.high_dpi = parse_bool(value).map_err(failed)?,
            ConfigKey::MosaicMaxTiles => {
                config.mosaic.max_tiles = parse_positive(value).map_err(failed)?
            }
            ConfigKey::MosaicJpegQuality => {
                config.mosaic.jpeg_quality = parse_quality(value).map_err(failed)?
            }
            ConfigKey::DownloadTimeout => {
                config.download.timeout = parse_positive(value).map_err(failed)?
            }
            ConfigKey::DownloadConcurrency => {
                config.download.concurrency = parse_positive(value).map_err(failed)?
            }
        }
        Ok(())
    }

    /// Get all supported configuration keys.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::SourceUrl,
            ConfigKey::SourceSuffix,
            ConfigKey::SourceHighDpi,
            ConfigKey::MosaicMaxTiles,
            ConfigKey::MosaicJpegQuality,
            ConfigKey::DownloadTimeout,
            ConfigKey::DownloadConcurrency,
        ]
    }
}
