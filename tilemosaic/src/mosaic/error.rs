//! Error types for mosaic assembly.

use std::fmt;

use crate::coord::TileIndex;

/// Errors that can occur while assembling a mosaic.
///
/// Both variants are precondition violations: the extraction pipeline only
/// calls the assembler with a complete, uniformly sized tile set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MosaicError {
    /// A tile of the grid is absent from the tile set.
    MissingTile(TileIndex),
    /// A tile's size differs from the first tile's size.
    TileSizeMismatch {
        index: TileIndex,
        expected: u32,
        actual: u32,
    },
    /// The tile set holds a tile that is not square.
    NotSquare {
        index: TileIndex,
        width: u32,
        height: u32,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MosaicError::MissingTile(index) => write!(f, "Tile {} is missing", index),
            MosaicError::TileSizeMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "Tile {} is {} pixels wide, expected {}",
                index, actual, expected
            ),
            MosaicError::NotSquare {
                index,
                width,
                height,
            } => write!(f, "Tile {} is not square ({}×{})", index, width, height),
        }
    }
}

impl std::error::Error for MosaicError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tile_display() {
        let err = MosaicError::MissingTile(TileIndex::new(2, 1, 3));
        assert_eq!(err.to_string(), "Tile 2/1/3 is missing");
    }

    #[test]
    fn test_size_mismatch_display() {
        let err = MosaicError::TileSizeMismatch {
            index: TileIndex::new(2, 1, 3),
            expected: 512,
            actual: 256,
        };
        assert_eq!(
            err.to_string(),
            "Tile 2/1/3 is 256 pixels wide, expected 512"
        );
    }
}
