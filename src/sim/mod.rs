//! Simulation engine
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform dependencies:
//! - Time comes only from the pause-aware [`SimClock`]
//! - Seeded RNG only
//! - Output leaves only through [`GameEvent`]s and read-only snapshots

pub mod adversary;
pub mod capture;
pub mod clock;
pub mod combo;
pub mod grid;
pub mod pickup;
pub mod state;
pub mod tick;
pub mod trail;

pub use adversary::{Adversary, AdversaryKind, spawn_adversaries};
pub use capture::{CaptureResult, adversary_reach, close_trail};
pub use clock::SimClock;
pub use combo::{Combo, ComboPhase};
pub use grid::{Direction, Tile, TileGrid, TilePos};
pub use pickup::{Pickup, PickupKind};
pub use state::{
    DeathCause, Flash, GameEvent, GamePhase, IntroStage, Player, SPAWN_TILE, SimulationState, Stats,
};
pub use tick::{TickInput, tick, trail_tiles};
pub use trail::Trail;
