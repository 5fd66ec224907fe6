//! Raster read/write helpers.
//!
//! Thin wrappers around the `image` crate: decode whatever a tile source
//! returns, flatten to RGB, and encode JPEG at a fixed quality.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, ImageReader, ImageResult, RgbImage};

/// JPEG quality used to normalize downloaded tiles.
pub const TILE_JPEG_QUALITY: u8 = 95;

/// JPEG quality used for the assembled mosaic.
pub const MOSAIC_JPEG_QUALITY: u8 = 100;

/// Decodes encoded image bytes of any supported format into RGB, dropping alpha.
pub fn decode_rgb(data: &[u8]) -> ImageResult<RgbImage> {
    let image = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()?;
    Ok(image.to_rgb8())
}

/// Encodes an RGB raster as JPEG.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> ImageResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    image.write_with_encoder(encoder)?;
    Ok(buffer)
}

/// Normalizes a downloaded tile: decode, drop alpha, re-encode as JPEG at
/// [`TILE_JPEG_QUALITY`] and decode again.
///
/// Returns the normalized JPEG bytes together with the raster decoded from
/// them. The result is lossy but deterministic for identical input bytes.
pub fn normalize_tile(data: &[u8]) -> ImageResult<(Vec<u8>, RgbImage)> {
    let rgb = decode_rgb(data)?;
    let jpeg = encode_jpeg(&rgb, TILE_JPEG_QUALITY)?;
    let image = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg)?.to_rgb8();
    Ok((jpeg, image))
}
