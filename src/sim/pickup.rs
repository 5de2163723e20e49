//! Bonus pickups
//!
//! Spawned at random interior tiles (revealed ones included), removed on
//! expiry or when the player gets close enough.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{TileGrid, TilePos};
use crate::consts::ITEM_EXPIRY_WARNING;
use crate::tile_center;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PickupKind {
    #[default]
    ScoreBonus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub tile: TilePos,
    /// Sim time the item appeared (ms)
    pub spawned_ms: f64,
    pub lifetime_ms: f64,
}

impl Pickup {
    pub fn center(&self) -> Vec2 {
        tile_center(self.tile.x, self.tile.y)
    }

    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        (self.spawned_ms + self.lifetime_ms - now_ms).max(0.0)
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.remaining_ms(now_ms) <= 0.0
    }

    /// Below 30% of its lifetime; the UI blinks it
    pub fn is_expiring(&self, now_ms: f64) -> bool {
        self.remaining_ms(now_ms) < self.lifetime_ms * ITEM_EXPIRY_WARNING
    }
}

/// Roll for a new item. Returns the tile if one should appear.
pub fn roll_spawn(rng: &mut impl Rng, grid: &TileGrid, active: usize, max_items: usize, chance: f64) -> Option<TilePos> {
    if active >= max_items || grid.width() < 3 || grid.height() < 3 {
        return None;
    }
    if !rng.random_bool(chance.clamp(0.0, 1.0)) {
        return None;
    }
    let x = rng.random_range(1..grid.width() - 1);
    let y = rng.random_range(1..grid.height() - 1);
    Some(TilePos::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn item(spawned_ms: f64) -> Pickup {
        Pickup {
            id: 1,
            kind: PickupKind::ScoreBonus,
            tile: TilePos::new(4, 4),
            spawned_ms,
            lifetime_ms: 1000.0,
        }
    }

    #[test]
    fn test_lifetime() {
        let p = item(500.0);
        assert!(!p.is_expired(1000.0));
        assert!(!p.is_expiring(1000.0));
        assert!(p.is_expiring(1250.0));
        assert!(p.is_expired(1500.0));
        assert_eq!(p.remaining_ms(2000.0), 0.0);
    }

    #[test]
    fn test_spawn_respects_cap() {
        let grid = TileGrid::new(10, 10);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(roll_spawn(&mut rng, &grid, 3, 3, 1.0), None);
    }

    #[test]
    fn test_spawn_lands_in_interior() {
        let grid = TileGrid::new(10, 8);
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..200 {
            let pos = roll_spawn(&mut rng, &grid, 0, 3, 1.0).expect("chance 1.0 always spawns");
            assert!(!grid.is_border(pos.x, pos.y));
        }
        assert_eq!(roll_spawn(&mut rng, &grid, 0, 3, 0.0), None);
    }
}
