//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use tilemosaic::config::{ConfigFileError, ConfigKeyError};
use tilemosaic::fetch::FetchError;
use tilemosaic::grid::GridError;
use tilemosaic::orchestrator::ExtractError;
use tilemosaic::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// Failed to set up the HTTP client or async runtime
    Setup(String),
    /// Extraction failed
    Extract(ExtractError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Extract(ExtractError::Plan(GridError::TooManyTiles { .. })) => {
                eprintln!();
                eprintln!("The area is too large for this zoom level. Either:");
                eprintln!("  1. Lower the zoom level (each level down divides the count by 4)");
                eprintln!("  2. Shrink the bounding box");
                eprintln!("  3. Raise the cap with --max-tiles or mosaic.max_tiles");
            }
            CliError::Extract(ExtractError::Fetch(FetchError::Source {
                source: ProviderError::HttpError(_),
                ..
            })) => {
                eprintln!();
                eprintln!("The tile server rejected a request. Check that:");
                eprintln!("  1. The source URL is the part before /{{z}}/{{x}}/{{y}}");
                eprintln!("  2. The suffix includes the format and any API key");
                eprintln!("  3. The source serves this zoom level");
            }
            CliError::Extract(ExtractError::Fetch(FetchError::Decode { .. })) => {
                eprintln!();
                eprintln!("The tile server answered with something that is not an image.");
                eprintln!("This usually means an invalid API key or an exceeded quota.");
            }
            CliError::Extract(ExtractError::Fetch(FetchError::UnexpectedSize {
                expected, ..
            })) => {
                eprintln!();
                if *expected == 512 {
                    eprintln!("The source serves 256 px tiles. Pass --low-dpi or run");
                    eprintln!("  'tilemosaic config set source.high_dpi false'");
                } else {
                    eprintln!("The source serves @2x tiles. Drop --low-dpi and set");
                    eprintln!("  'tilemosaic config set source.high_dpi true'");
                }
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Use 'tilemosaic config list' to see the current settings.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Setup(msg) => write!(f, "Setup failed: {}", msg),
            CliError::Extract(e) => write!(f, "Extraction failed: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Extract(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ExtractError> for CliError {
    fn from(e: ExtractError) -> Self {
        CliError::Extract(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ConfigKeyError> for CliError {
    fn from(e: ConfigKeyError) -> Self {
        CliError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_wraps_extract_error() {
        let err = CliError::from(ExtractError::Plan(GridError::TooManyTiles {
            count: 600,
            max: 500,
        }));
        let text = err.to_string();
        assert!(text.starts_with("Extraction failed:"));
        assert!(text.contains("600"));
    }

    #[test]
    fn test_file_write_display() {
        let err = CliError::FileWrite {
            path: "out.jpg".to_string(),
            error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write file 'out.jpg': denied");
        assert!(std::error::Error::source(&err).is_some());
    }
}
