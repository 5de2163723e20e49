//! Adversary motion
//!
//! Bouncers drift through hidden and trail territory, reflecting off revealed
//! ground and the grid edge one axis at a time.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Tile, TileGrid};
use crate::tile_of;

/// Adversary variants (only one behavior so far)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdversaryKind {
    #[default]
    Bouncer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adversary {
    pub id: u32,
    pub kind: AdversaryKind,
    /// Position in tile units
    pub pos: Vec2,
    /// Tiles per second
    pub vel: Vec2,
}

/// True when an adversary may not enter this tile
fn blocks(grid: &TileGrid, x: i32, y: i32) -> bool {
    match grid.get_signed(x, y) {
        None => true,
        Some(tile) => tile == Tile::Revealed,
    }
}

impl Adversary {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind: AdversaryKind::Bouncer,
            pos,
            vel,
        }
    }

    /// Tile currently containing the adversary
    pub fn tile(&self) -> (i32, i32) {
        tile_of(self.pos)
    }

    /// Integrate by `dt` seconds with independent-axis reflection.
    ///
    /// Each axis is tested against the pre-move coordinate of the other axis. A
    /// diagonal step can therefore land in a revealed corner tile for a frame
    /// when neither axis alone is blocked. Long frames are split so no sub-step
    /// moves more than one tile along either axis.
    pub fn step(&mut self, grid: &TileGrid, dt: f32) {
        let travel = (self.vel * dt).abs().max_element();
        let substeps = if travel.is_finite() { travel.ceil().max(1.0) as u32 } else { 1 };
        let sub_dt = dt / substeps as f32;
        for _ in 0..substeps {
            self.advance(grid, sub_dt);
        }
    }

    fn advance(&mut self, grid: &TileGrid, dt: f32) {
        let next = self.pos + self.vel * dt;

        let (tx, ty) = tile_of(Vec2::new(next.x, self.pos.y));
        let new_x = if blocks(grid, tx, ty) {
            self.vel.x = -self.vel.x;
            self.pos.x
        } else {
            next.x
        };

        let (tx, ty) = tile_of(Vec2::new(self.pos.x, next.y));
        let new_y = if blocks(grid, tx, ty) {
            self.vel.y = -self.vel.y;
            self.pos.y
        } else {
            next.y
        };

        self.pos = Vec2::new(new_x, new_y);
    }

    /// Standing on the player's trail
    pub fn on_trail(&self, grid: &TileGrid) -> bool {
        let (x, y) = self.tile();
        grid.get_signed(x, y) == Some(Tile::Trail)
    }

    /// Within `radius` of `point`
    pub fn touches(&self, point: Vec2, radius: f32) -> bool {
        self.pos.distance(point) < radius
    }
}

/// Spawn `count` adversaries around the grid centre with random headings.
pub fn spawn_adversaries(rng: &mut impl Rng, grid: &TileGrid, count: u32, speed: f32) -> Vec<Adversary> {
    use std::f32::consts::FRAC_PI_2;

    let center = Vec2::new(grid.width() as f32 / 2.0, grid.height() as f32 / 2.0);
    (0..count)
        .map(|i| {
            let jitter = Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0));
            let mut pos = center + jitter;
            let (tx, ty) = tile_of(pos);
            if blocks(grid, tx, ty) {
                pos = center;
            }

            // Keep clear of pure horizontal/vertical headings so bouncers sweep diagonally
            let quadrant = rng.random_range(0..4) as f32 * FRAC_PI_2;
            let angle = quadrant + rng.random_range(0.25..FRAC_PI_2 - 0.25);
            let speed = speed * rng.random_range(0.85..1.15);
            let vel = Vec2::new(angle.cos(), angle.sin()) * speed;

            Adversary::new(i + 1, pos, vel)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::TilePos;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_free_motion() {
        let grid = TileGrid::new(20, 20);
        let mut adv = Adversary::new(1, Vec2::new(10.0, 10.0), Vec2::new(2.0, -1.0));
        adv.step(&grid, 0.5);
        assert!((adv.pos - Vec2::new(11.0, 9.5)).length() < 1e-5);
        assert_eq!(adv.vel, Vec2::new(2.0, -1.0));
    }

    #[test]
    fn test_reflects_off_revealed_x_axis() {
        let grid = TileGrid::new(20, 20);
        // Right border is column 19
        let mut adv = Adversary::new(1, Vec2::new(18.8, 10.0), Vec2::new(1.0, 1.0));
        adv.step(&grid, 0.5);
        assert_eq!(adv.vel, Vec2::new(-1.0, 1.0));
        assert!((adv.pos.x - 18.8).abs() < 1e-5);
        assert!((adv.pos.y - 10.5).abs() < 1e-5);
    }

    #[test]
    fn test_corner_flips_both_axes() {
        let grid = TileGrid::new(20, 20);
        let mut adv = Adversary::new(1, Vec2::new(1.2, 1.2), Vec2::new(-1.0, -1.0));
        adv.step(&grid, 0.5);
        assert_eq!(adv.vel, Vec2::new(1.0, 1.0));
        assert_eq!(adv.pos, Vec2::new(1.2, 1.2));
    }

    #[test]
    fn test_diagonal_tunnel_into_revealed_corner() {
        // Known behavior: per-axis tests use the other axis's old coordinate,
        // so a revealed tile touched only diagonally is not seen.
        let mut grid = TileGrid::new(10, 10);
        grid.set(TilePos::new(5, 5), Tile::Revealed);
        let mut adv = Adversary::new(1, Vec2::new(4.9, 4.9), Vec2::new(1.0, 1.0));
        adv.step(&grid, 0.2);
        assert_eq!(adv.tile(), (5, 5));
        assert_eq!(adv.vel, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_long_frame_cannot_hop_a_wall() {
        let mut grid = TileGrid::new(20, 20);
        for y in 1..19 {
            grid.set(TilePos::new(10, y), Tile::Revealed);
        }
        // 1.4 tiles in one frame would clear column 10 unchecked
        let mut adv = Adversary::new(1, Vec2::new(9.8, 10.5), Vec2::new(14.0, 0.0));
        adv.step(&grid, 0.1);
        assert!(adv.pos.x < 10.0);
        assert_eq!(adv.vel, Vec2::new(-14.0, 0.0));
    }

    #[test]
    fn test_on_trail_and_touch() {
        let mut grid = TileGrid::new(10, 10);
        grid.set(TilePos::new(3, 4), Tile::Trail);
        let adv = Adversary::new(1, Vec2::new(3.5, 4.2), Vec2::ZERO);
        assert!(adv.on_trail(&grid));
        assert!(adv.touches(Vec2::new(4.5, 4.5), 2.0));
        assert!(!adv.touches(Vec2::new(6.5, 4.5), 2.0));
    }

    #[test]
    fn test_spawn_near_center_on_hidden() {
        let grid = TileGrid::new(60, 45);
        let mut rng = Pcg32::seed_from_u64(7);
        let advs = spawn_adversaries(&mut rng, &grid, 4, 10.0);
        assert_eq!(advs.len(), 4);
        for adv in &advs {
            let (x, y) = adv.tile();
            assert_eq!(grid.get_signed(x, y), Some(Tile::Hidden));
            assert!((adv.pos - Vec2::new(30.0, 22.5)).length() < 3.0);
            assert!(adv.vel.x != 0.0 && adv.vel.y != 0.0);
            let speed = adv.vel.length();
            assert!((8.5..=11.5).contains(&speed));
        }
    }
}
