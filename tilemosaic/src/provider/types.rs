//! Provider types and traits

use std::fmt;
use std::future::Future;

/// Errors that can occur while obtaining raw tile bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// HTTP request failed
    HttpError(String),
    /// Zoom level not supported by this source
    UnsupportedZoom(u8),
    /// Invalid response data from the source
    InvalidResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::UnsupportedZoom(zoom) => {
                write!(f, "Zoom level {} not supported by tile source", zoom)
            }
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Capability to fetch the raw bytes of one slippy-map tile.
///
/// URL layout, authentication, format suffixes and any retry policy are the
/// implementor's business. Implementations must be shareable across tasks
/// since tiles are fetched concurrently.
pub trait TileSource: Send + Sync {
    /// Fetches the encoded image of tile (`x`, `y`) at `zoom`.
    ///
    /// # Returns
    ///
    /// Raw image data (PNG, JPEG, ...) or an error.
    fn fetch_tile(
        &self,
        zoom: u8,
        x: u32,
        y: u32,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Returns the source's name for logging and identification.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        assert_eq!(
            ProviderError::HttpError("HTTP 404".into()).to_string(),
            "HTTP error: HTTP 404"
        );
        assert_eq!(
            ProviderError::UnsupportedZoom(23).to_string(),
            "Zoom level 23 not supported by tile source"
        );
        assert_eq!(
            ProviderError::InvalidResponse("empty body".into()).to_string(),
            "Invalid response: empty body"
        );
    }
}
