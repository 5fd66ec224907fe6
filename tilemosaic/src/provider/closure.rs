//! Tile source backed by a plain async function.

use std::future::Future;

use super::types::{ProviderError, TileSource};

/// Adapts a function `(zoom, x, y) -> bytes` into a [`TileSource`].
///
/// Handy when tiles come from somewhere other than HTTP (a local cache, an
/// MBTiles reader) or in tests.
///
/// # Example
///
/// ```
/// use tilemosaic::provider::{FnTileSource, ProviderError};
///
/// let source = FnTileSource::new("static", |_zoom: u8, _x: u32, _y: u32| async {
///     Ok::<_, ProviderError>(vec![0u8; 4])
/// });
/// ```
pub struct FnTileSource<F> {
    name: String,
    fetch: F,
}

impl<F> FnTileSource<F> {
    /// Wraps `fetch` under the given source name.
    pub fn new(name: impl Into<String>, fetch: F) -> Self {
        Self {
            name: name.into(),
            fetch,
        }
    }
}

impl<F, Fut> TileSource for FnTileSource<F>
where
    F: Fn(u8, u32, u32) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<u8>, ProviderError>> + Send,
{
    fn fetch_tile(
        &self,
        zoom: u8,
        x: u32,
        y: u32,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send {
        (self.fetch)(zoom, x, y)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passes_coordinates_through() {
        let source = FnTileSource::new("echo", |zoom: u8, x: u32, y: u32| async move {
            Ok::<_, ProviderError>(vec![zoom, x as u8, y as u8])
        });

        assert_eq!(source.fetch_tile(3, 4, 5).await.unwrap(), vec![3, 4, 5]);
        assert_eq!(source.name(), "echo");
    }

    #[tokio::test]
    async fn test_propagates_errors() {
        let source = FnTileSource::new("broken", |_: u8, _: u32, _: u32| async {
            Err::<Vec<u8>, _>(ProviderError::HttpError("503".to_string()))
        });

        assert_eq!(
            source.fetch_tile(1, 0, 0).await,
            Err(ProviderError::HttpError("503".to_string()))
        );
    }
}
