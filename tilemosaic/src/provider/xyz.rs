//! XYZ tile source over HTTP.
//!
//! Covers the common `{base}/{z}/{x}/{y}{suffix}` layout served by most
//! slippy-map tile servers, as well as explicit templates containing `{z}`,
//! `{x}` and `{y}` placeholders.
//!
//! # Examples of suffixes
//!
//! - `.png` for plain OSM-style servers
//! - `@2x.jpg?key=YOUR_KEY` for high-dpi keyed services
//!
//! Keys and format suffixes are opaque here: whatever the caller provides is
//! appended verbatim.

use super::http::AsyncHttpClient;
use super::types::{ProviderError, TileSource};

/// Default zoom range accepted by an XYZ source.
const MIN_ZOOM: u8 = 0;
const MAX_ZOOM: u8 = 22;

/// Tile source fetching `{base}/{z}/{x}/{y}{suffix}` over HTTP.
///
/// # Example
///
/// ```ignore
/// use tilemosaic::provider::{AsyncReqwestClient, XyzTileSource};
///
/// let client = AsyncReqwestClient::new()?;
/// let source = XyzTileSource::new(client, "https://tiles.example.com/satellite", "@2x.jpg");
/// ```
pub struct XyzTileSource<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    suffix: String,
    min_zoom: u8,
    max_zoom: u8,
}

impl<C: AsyncHttpClient> XyzTileSource<C> {
    /// Creates a source for the given base URL and suffix.
    ///
    /// If `base_url` contains `{z}`, `{x}` and `{y}` placeholders, it is used
    /// as a full template and the suffix is appended after substitution.
    pub fn new(http_client: C, base_url: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            suffix: suffix.into(),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    /// Restricts the zoom levels this source accepts.
    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    /// Checks if this source supports the given zoom level.
    pub fn supports_zoom(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom && zoom <= self.max_zoom
    }

    fn is_template(&self) -> bool {
        self.base_url.contains("{z}") && self.base_url.contains("{x}") && self.base_url.contains("{y}")
    }

    /// Builds the tile URL for the given coordinates.
    pub fn build_url(&self, zoom: u8, x: u32, y: u32) -> String {
        if self.is_template() {
            let url = self
                .base_url
                .replace("{z}", &zoom.to_string())
                .replace("{x}", &x.to_string())
                .replace("{y}", &y.to_string());
            format!("{}{}", url, self.suffix)
        } else {
            format!(
                "{}/{}/{}/{}{}",
                self.base_url.trim_end_matches('/'),
                zoom,
                x,
                y,
                self.suffix
            )
        }
    }
}

impl<C: AsyncHttpClient> TileSource for XyzTileSource<C> {
    async fn fetch_tile(&self, zoom: u8, x: u32, y: u32) -> Result<Vec<u8>, ProviderError> {
        if !self.supports_zoom(zoom) {
            return Err(ProviderError::UnsupportedZoom(zoom));
        }

        let url = self.build_url(zoom, x, y);
        let data = self.http_client.get(&url).await?;
        if data.is_empty() {
            return Err(ProviderError::InvalidResponse(format!(
                "empty body from {}",
                url
            )));
        }
        Ok(data)
    }

    fn name(&self) -> &str {
        "XYZ"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockAsyncHttpClient;

    fn sample_jpeg_response() -> Vec<u8> {
        // Minimal valid JPEG header
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46]
    }

    #[test]
    fn test_url_construction() {
        let source = XyzTileSource::new(
            MockAsyncHttpClient::new(Ok(vec![])),
            "https://tiles.example.com/sat/",
            "@2x.jpg?key=abc",
        );
        assert_eq!(
            source.build_url(16, 34090, 23000),
            "https://tiles.example.com/sat/16/34090/23000@2x.jpg?key=abc"
        );
    }

    #[test]
    fn test_template_url_construction() {
        let source = XyzTileSource::new(
            MockAsyncHttpClient::new(Ok(vec![])),
            "https://tiles.example.com/{z}/{y}/{x}",
            "",
        );
        assert_eq!(
            source.build_url(5, 10, 20),
            "https://tiles.example.com/5/20/10"
        );
    }

    #[test]
    fn test_supports_zoom() {
        let source = XyzTileSource::new(MockAsyncHttpClient::new(Ok(vec![])), "http://t", ".png")
            .with_zoom_range(2, 18);
        assert!(!source.supports_zoom(1));
        assert!(source.supports_zoom(2));
        assert!(source.supports_zoom(18));
        assert!(!source.supports_zoom(19));
    }

    #[tokio::test]
    async fn test_fetch_tile_requests_url() {
        let source = XyzTileSource::new(
            MockAsyncHttpClient::new(Ok(sample_jpeg_response())),
            "http://t",
            ".jpg",
        );

        let data = source.fetch_tile(3, 1, 2).await.unwrap();
        assert_eq!(data, sample_jpeg_response());
        assert_eq!(source.http_client.requested_urls(), vec!["http://t/3/1/2.jpg"]);
    }

    #[tokio::test]
    async fn test_fetch_tile_unsupported_zoom() {
        let source = XyzTileSource::new(MockAsyncHttpClient::new(Ok(vec![1])), "http://t", "")
            .with_zoom_range(0, 10);

        let result = source.fetch_tile(11, 0, 0).await;
        assert_eq!(result, Err(ProviderError::UnsupportedZoom(11)));
        assert!(source.http_client.requested_urls().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_tile_empty_body() {
        let source = XyzTileSource::new(MockAsyncHttpClient::new(Ok(vec![])), "http://t", "");
        let result = source.fetch_tile(1, 0, 0).await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_fetch_tile_http_error() {
        let source = XyzTileSource::new(
            MockAsyncHttpClient::new(Err(ProviderError::HttpError("HTTP 404".into()))),
            "http://t",
            "",
        );
        let result = source.fetch_tile(1, 0, 0).await;
        assert_eq!(result, Err(ProviderError::HttpError("HTTP 404".into())));
    }
}
