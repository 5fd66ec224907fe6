//! Fetched tile and fetch errors

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::RgbImage;

use crate::coord::TileIndex;
use crate::georef::{world_file_path, GeoTransform};
use crate::provider::ProviderError;

/// A decoded, georeferenced tile raster.
///
/// The raster is always square and RGB. The normalized JPEG it was decoded
/// from is kept so the tile can be written without another lossy pass.
#[derive(Debug, Clone)]
pub struct Tile {
    index: TileIndex,
    jpeg: Vec<u8>,
    image: RgbImage,
    geo_transform: GeoTransform,
}

impl Tile {
    pub(crate) fn new(
        index: TileIndex,
        jpeg: Vec<u8>,
        image: RgbImage,
        geo_transform: GeoTransform,
    ) -> Self {
        Self {
            index,
            jpeg,
            image,
            geo_transform,
        }
    }

    /// Builds a tile from a raster, encoding its JPEG at the normalization
    /// quality.
    #[cfg(test)]
    pub(crate) fn from_image(index: TileIndex, image: RgbImage, geo_transform: GeoTransform) -> Self {
        let jpeg = crate::raster::encode_jpeg(&image, crate::raster::TILE_JPEG_QUALITY)
            .expect("encode test tile");
        Self::new(index, jpeg, image, geo_transform)
    }

    pub fn index(&self) -> TileIndex {
        self.index
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn geo_transform(&self) -> &GeoTransform {
        &self.geo_transform
    }

    /// Side length of the raster in pixels.
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// The normalized JPEG bytes the raster was decoded from.
    pub fn jpeg(&self) -> &[u8] {
        &self.jpeg
    }

    /// File name used when a tile is written on its own: `{x}_{y}.jpg`.
    pub fn file_name(&self) -> String {
        format!("{}_{}.jpg", self.index.x, self.index.y)
    }

    /// Writes the tile as `{x}_{y}.jpg` plus its `.jgw` world file into `dir`.
    ///
    /// Returns the path of the written image.
    pub fn save(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(self.file_name());
        std::fs::write(&path, &self.jpeg)?;
        std::fs::write(world_file_path(&path), self.geo_transform.to_world_file())?;
        Ok(path)
    }
}

/// Errors that can occur while fetching a single tile.
///
/// Every variant names the tile it concerns.
#[derive(Debug)]
pub enum FetchError {
    /// The tile source could not deliver the bytes
    Source {
        index: TileIndex,
        source: ProviderError,
    },
    /// The bytes could not be decoded as an image
    Decode { index: TileIndex, message: String },
    /// The decoded raster is not square
    NotSquare {
        index: TileIndex,
        width: u32,
        height: u32,
    },
    /// The tile's side length does not match the source's tile size, so its
    /// resolution would be wrong
    UnexpectedSize {
        index: TileIndex,
        expected: u32,
        actual: u32,
    },
    /// The source did not answer within the configured timeout
    Timeout { index: TileIndex, after: Duration },
}

impl FetchError {
    /// The tile this error concerns.
    pub fn index(&self) -> TileIndex {
        match self {
            FetchError::Source { index, .. }
            | FetchError::Decode { index, .. }
            | FetchError::NotSquare { index, .. }
            | FetchError::UnexpectedSize { index, .. }
            | FetchError::Timeout { index, .. } => *index,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Source { index, source } => {
                write!(f, "Failed to fetch tile {}: {}", index, source)
            }
            FetchError::Decode { index, message } => {
                write!(f, "Failed to decode tile {}: {}", index, message)
            }
            FetchError::NotSquare {
                index,
                width,
                height,
            } => write!(
                f,
                "Tile {} is not square ({}×{} pixels)",
                index, width, height
            ),
            FetchError::UnexpectedSize {
                index,
                expected,
                actual,
            } => write!(
                f,
                "Tile {} is {} pixels wide, expected {}",
                index, actual, expected
            ),
            FetchError::Timeout { index, after } => {
                write!(f, "Timeout after {:?} fetching tile {}", after, index)
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Source { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::NotSquare {
            index: TileIndex::new(5, 3, 4),
            width: 256,
            height: 128,
        };
        assert_eq!(err.to_string(), "Tile 5/3/4 is not square (256×128 pixels)");
    }

    #[test]
    fn test_unexpected_size_display() {
        let err = FetchError::UnexpectedSize {
            index: TileIndex::new(5, 3, 4),
            expected: 512,
            actual: 256,
        };
        assert_eq!(err.to_string(), "Tile 5/3/4 is 256 pixels wide, expected 512");
        assert_eq!(err.index(), TileIndex::new(5, 3, 4));
    }

    #[test]
    fn test_fetch_error_source_chain() {
        let err = FetchError::Source {
            index: TileIndex::new(1, 0, 1),
            source: ProviderError::HttpError("HTTP 503".into()),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("1/0/1"));
        assert_eq!(err.index(), TileIndex::new(1, 0, 1));
    }

    #[test]
    fn test_tile_save_writes_image_and_world_file() {
        let dir = tempfile::tempdir().unwrap();
        let index = TileIndex::new(3, 4, 2);
        let tile = Tile::from_image(
            index,
            RgbImage::from_pixel(32, 32, image::Rgb([10, 120, 200])),
            GeoTransform::for_tile(&index, true),
        );

        let path = tile.save(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "4_2.jpg");
        assert_eq!(std::fs::read(&path).unwrap(), tile.jpeg());

        let world = std::fs::read_to_string(dir.path().join("4_2.jgw")).unwrap();
        let parsed = GeoTransform::from_world_file(&world).unwrap();
        assert!((parsed.origin_x - tile.geo_transform().origin_x).abs() < 1e-3);
        assert!((parsed.origin_y - tile.geo_transform().origin_y).abs() < 1e-3);
    }
}
