//! Tile source abstraction
//!
//! This module provides the [`TileSource`] capability used to obtain raw tile
//! bytes, an HTTP client abstraction for testability, and the stock sources:
//!
//! - [`XyzTileSource`] - `{base}/{z}/{x}/{y}{suffix}` over HTTP
//! - [`FnTileSource`] - wraps any async function `(zoom, x, y) -> bytes`
//!
//! ```ignore
//! use tilemosaic::provider::{AsyncReqwestClient, XyzTileSource};
//!
//! let http_client = AsyncReqwestClient::new()?;
//! let source = XyzTileSource::new(http_client, "https://tiles.example.com", ".png");
//! ```

mod closure;
mod http;
mod types;
mod xyz;

pub use closure::FnTileSource;
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use types::{ProviderError, TileSource};
pub use xyz::XyzTileSource;

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
