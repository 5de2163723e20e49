//! Tile grid
//!
//! Ground truth of what is revealed, hidden, or part of the trail in flight.

use serde::{Deserialize, Serialize};

/// State of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    /// Uncaptured territory, adversaries roam here
    #[default]
    Hidden,
    /// Safe ground, permanent once set
    Revealed,
    /// Part of the player's current cut
    Trail,
}

/// Integer tile coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: u32,
    pub y: u32,
}

impl TilePos {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Directional input, sampled once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit offset (y grows downwards)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::None => (0, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Map a raw vector (e.g. from a joystick or JS) to a direction
    pub fn from_delta(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Direction::Up,
            (0, 1) => Direction::Down,
            (-1, 0) => Direction::Left,
            (1, 0) => Direction::Right,
            _ => Direction::None,
        }
    }
}

/// Fixed-size rectangular tile matrix (row-major)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// New grid with a revealed border and hidden interior
    pub fn new(width: u32, height: u32) -> Self {
        let mut grid = Self {
            width,
            height,
            tiles: vec![Tile::Hidden; (width * height) as usize],
        };
        grid.reset();
        grid
    }

    /// Restore the initial pattern: border revealed, interior hidden
    pub fn reset(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let i = self.index(x, y);
                self.tiles[i] = if self.is_border(x, y) {
                    Tile::Revealed
                } else {
                    Tile::Hidden
                };
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    pub fn pos_of(&self, index: usize) -> TilePos {
        let i = index as u32;
        TilePos::new(i % self.width, i / self.width)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    pub fn is_border(&self, x: u32, y: u32) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    pub fn get(&self, pos: TilePos) -> Tile {
        self.tiles[self.index(pos.x, pos.y)]
    }

    /// Tile at signed coordinates, `None` when outside the grid
    pub fn get_signed(&self, x: i32, y: i32) -> Option<Tile> {
        if self.in_bounds(x, y) {
            Some(self.tiles[self.index(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// Set a tile. Border tiles are immutable and silently ignored.
    pub fn set(&mut self, pos: TilePos, tile: Tile) {
        if self.is_border(pos.x, pos.y) {
            return;
        }
        let i = self.index(pos.x, pos.y);
        self.tiles[i] = tile;
    }

    /// Neighbour in `dir`, `None` when it would leave the grid
    pub fn step(&self, from: TilePos, dir: Direction) -> Option<TilePos> {
        let (dx, dy) = dir.delta();
        let x = from.x as i32 + dx;
        let y = from.y as i32 + dy;
        self.in_bounds(x, y).then(|| TilePos::new(x as u32, y as u32))
    }

    /// Raw tiles, row-major
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    /// Percentage of all tiles that are revealed
    pub fn revealed_percent(&self) -> f32 {
        if self.tiles.is_empty() {
            return 0.0;
        }
        self.count(Tile::Revealed) as f32 * 100.0 / self.tiles.len() as f32
    }
}
