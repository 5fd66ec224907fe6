//! Collection of fetched tiles keyed by index.

use std::collections::hash_map::{Entry, HashMap};

use crate::coord::TileIndex;
use crate::fetch::Tile;

/// Fetched tiles, one slot per [`TileIndex`].
///
/// A slot is written at most once; a second insert for the same index is
/// rejected and hands the tile back.
#[derive(Debug, Default)]
pub struct TileSet {
    tiles: HashMap<TileIndex, Tile>,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tiles: HashMap::with_capacity(capacity),
        }
    }

    /// Stores a tile under its own index.
    ///
    /// Returns `Err(tile)` if that index is already occupied.
    pub fn insert(&mut self, tile: Tile) -> Result<(), Tile> {
        match self.tiles.entry(tile.index()) {
            Entry::Occupied(_) => Err(tile),
            Entry::Vacant(slot) => {
                slot.insert(tile);
                Ok(())
            }
        }
    }

    pub fn get(&self, index: &TileIndex) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn contains(&self, index: &TileIndex) -> bool {
        self.tiles.contains_key(index)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }
}
