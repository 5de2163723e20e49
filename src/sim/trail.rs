//! Trail tracker
//!
//! Ordered record of tiles carved since the player left safe ground.

use serde::{Deserialize, Serialize};

use super::grid::{Tile, TileGrid, TilePos};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    tiles: Vec<TilePos>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carve `pos` into the grid and append it.
    ///
    /// Returns false (and changes nothing) unless the tile is hidden.
    pub fn carve(&mut self, grid: &mut TileGrid, pos: TilePos) -> bool {
        if grid.get(pos) != Tile::Hidden {
            return false;
        }
        grid.set(pos, Tile::Trail);
        self.tiles.push(pos);
        true
    }

    /// Turn every trail tile back into hidden ground and clear
    pub fn revert(&mut self, grid: &mut TileGrid) {
        for pos in self.tiles.drain(..) {
            if grid.get(pos) == Tile::Trail {
                grid.set(pos, Tile::Hidden);
            }
        }
    }

    /// Take the tiles out, leaving the tracker empty
    pub fn take(&mut self) -> Vec<TilePos> {
        std::mem::take(&mut self.tiles)
    }

    pub fn tiles(&self) -> &[TilePos] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        self.tiles.contains(&pos)
    }
}
