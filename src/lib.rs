//! Trail Carver - a grid-carving arcade game engine
//!
//! Core modules:
//! - `sim`: Simulation engine (tile grid, trail, capture, adversaries, combo, pickups)
//! - `config`: Per-level tuning, loadable from JSON
//! - `session`: Level progression and the continue countdown
//!
//! Rendering, audio and persistence belong to the embedding application,
//! which reads [`sim::SimulationState`] snapshots and drains [`sim::GameEvent`]s.

pub mod config;
pub mod session;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ConfigError, LevelConfig};
pub use session::{Session, SessionPhase};

use glam::Vec2;

/// Game configuration constants (defaults for [`LevelConfig`])
pub mod consts {
    /// Grid dimensions (fixed for all levels in practice)
    pub const GRID_WIDTH: u32 = 60;
    pub const GRID_HEIGHT: u32 = 45;

    /// Player
    pub const START_LIVES: u8 = 3;
    /// Minimum time between two player steps (ms)
    pub const MOVE_INTERVAL_MS: f64 = 60.0;
    /// Grace period after losing a life (ms)
    pub const INVULNERABILITY_MS: f64 = 3000.0;

    /// Adversaries
    pub const ADVERSARY_COUNT: u32 = 1;
    /// Tiles per second
    pub const ADVERSARY_SPEED: f32 = 12.0;
    /// Direct-contact radius in tile units
    pub const CONTACT_RADIUS: f32 = 2.0;

    /// Combo
    pub const COMBO_TIMEOUT_MS: f64 = 2500.0;
    pub const IDLE_TIMEOUT_MS: f64 = 2000.0;
    pub const POINTS_PER_TILE: u64 = 10;
    /// Every Nth consecutive capture is a milestone
    pub const COMBO_MILESTONE: u32 = 3;

    /// Pickups
    pub const ITEM_LIFETIME_MS: f64 = 8000.0;
    /// Per-tick spawn probability
    pub const ITEM_SPAWN_CHANCE: f64 = 0.003;
    pub const MAX_ITEMS: usize = 3;
    pub const ITEM_COLLECT_RADIUS: f32 = 1.5;
    pub const ITEM_BONUS: u64 = 250;
    /// Fraction of lifetime below which an item telegraphs expiry
    pub const ITEM_EXPIRY_WARNING: f64 = 0.3;

    /// Win threshold (percent of all tiles revealed)
    pub const MIN_REVEAL_PERCENT: f32 = 75.0;

    /// Intro sequence
    pub const INTRO_READY_MS: f64 = 1200.0;
    pub const INTRO_GO_MS: f64 = 600.0;

    /// Continue countdown after game over
    pub const CONTINUE_WINDOW_MS: f64 = 9000.0;

    /// Visual flash durations (ms)
    pub const CAPTURE_FLASH_MS: f64 = 400.0;
    pub const TRAIL_FLASH_MS: f64 = 200.0;

    /// Largest frame delta fed to the clock (ms), avoids huge jumps after a stall
    pub const MAX_FRAME_MS: f64 = 100.0;
}

/// Centre of a tile in continuous tile units
#[inline]
pub fn tile_center(x: u32, y: u32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// Tile containing a continuous position (may be negative / out of range)
#[inline]
pub fn tile_of(pos: Vec2) -> (i32, i32) {
    (pos.x.floor() as i32, pos.y.floor() as i32)
}
