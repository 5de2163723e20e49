//! Simulation state and core types
//!
//! One [`SimulationState`] is built per level attempt and owned by the caller;
//! [`super::tick`] is the only thing that mutates it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::adversary::{Adversary, spawn_adversaries};
use super::clock::SimClock;
use super::combo::Combo;
use super::grid::{TileGrid, TilePos};
use super::pickup::Pickup;
use super::trail::Trail;
use crate::config::LevelConfig;
use crate::tile_center;

/// Where the player (re)spawns: the top-left corner of the border
pub const SPAWN_TILE: TilePos = TilePos::new(0, 0);

/// Stages of the level intro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntroStage {
    Ready,
    Go,
}

/// Current phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// READY / GO sequence, entities frozen
    Intro(IntroStage),
    /// Active gameplay
    Playing,
    /// Clock suspended
    Paused,
    /// Win threshold reached, clock stopped
    LevelComplete,
    /// Out of lives, clock stopped
    GameOver,
}

/// What killed the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Walked back into the trail
    SelfCrossing,
    /// An adversary reached the trail
    TrailCut,
    /// An adversary got too close
    Contact,
}

/// Numbers surfaced to the UI every tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Percentage of the grid revealed
    pub area_revealed: f32,
    /// Play time, excluding intro and pauses (ms)
    pub elapsed_ms: f64,
    pub score: u64,
}

/// Outbound events, drained by the embedding application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    IntroCue(IntroStage),
    Stats(Stats),
    LivesChanged { lives: u8 },
    PlayerDied { cause: DeathCause, at: TilePos },
    AreaCaptured { tiles: usize, points: u64, combo: u32 },
    ComboMilestone { combo: u32 },
    ComboBroken,
    ItemCollected { tile: TilePos, bonus: u64 },
    LevelComplete(Stats),
    GameOver(Stats),
}

/// Short-lived highlight on a tile (visual only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub tile: TilePos,
    /// 1.0 for captured tiles, weaker for sealed trail
    pub strength: f32,
    pub expires_ms: f64,
}

/// The player-controlled cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: TilePos,
    pub lives: u8,
    /// Currently cutting through hidden ground
    pub is_drawing: bool,
    /// Lethal events are ignored until this sim time (ms)
    pub invulnerable_until_ms: f64,
    /// Sim time of the last step (ms)
    pub last_move_ms: f64,
}

impl Player {
    pub fn new(lives: u8) -> Self {
        Self {
            pos: SPAWN_TILE,
            lives,
            is_drawing: false,
            invulnerable_until_ms: 0.0,
            last_move_ms: 0.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        tile_center(self.pos.x, self.pos.y)
    }

    pub fn is_invulnerable(&self, now_ms: f64) -> bool {
        now_ms < self.invulnerable_until_ms
    }
}

/// Complete state of one level attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: LevelConfig,
    /// 1-based level number
    pub level: u32,
    pub phase: GamePhase,
    /// Phase to return to when unpausing
    pub resume_phase: GamePhase,
    /// Deadline of the current intro stage (sim ms)
    pub intro_deadline_ms: f64,
    /// Sim time gameplay started (after the intro)
    pub play_started_ms: f64,
    pub clock: SimClock,
    pub grid: TileGrid,
    pub trail: Trail,
    pub player: Player,
    pub adversaries: Vec<Adversary>,
    pub pickups: Vec<Pickup>,
    pub combo: Combo,
    pub score: u64,
    /// Last published stats
    pub stats: Stats,
    /// Pending events (drain with [`SimulationState::drain_events`])
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Visual flashes (not gameplay-affecting)
    #[serde(skip)]
    pub flashes: Vec<Flash>,
    next_id: u32,
}

impl SimulationState {
    /// Build a fresh level: reset grid, spawn adversaries, start the intro
    pub fn new(config: LevelConfig, level: u32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = TileGrid::new(config.grid_width, config.grid_height);
        let adversaries = spawn_adversaries(&mut rng, &grid, config.adversary_count, config.adversary_speed);
        let next_id = adversaries.len() as u32 + 1;

        let stats = Stats {
            area_revealed: grid.revealed_percent(),
            elapsed_ms: 0.0,
            score: 0,
        };

        log::info!(
            "Level {} start: {}x{} grid, {} adversaries, win at {}%",
            level,
            config.grid_width,
            config.grid_height,
            config.adversary_count,
            config.min_reveal_percent
        );

        Self {
            seed,
            rng,
            player: Player::new(config.lives),
            intro_deadline_ms: config.intro_ready_ms,
            config,
            level,
            phase: GamePhase::Intro(IntroStage::Ready),
            resume_phase: GamePhase::Intro(IntroStage::Ready),
            play_started_ms: 0.0,
            clock: SimClock::new(),
            grid,
            trail: Trail::new(),
            adversaries,
            pickups: Vec::new(),
            combo: Combo::new(),
            score: 0,
            stats,
            events: vec![GameEvent::IntroCue(IntroStage::Ready)],
            flashes: Vec::new(),
            next_id,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Leave the intro and start gameplay at the current sim time
    pub fn begin_play(&mut self) {
        let now = self.clock.now();
        self.phase = GamePhase::Playing;
        self.play_started_ms = now;
        // Allow a step on the very first tick
        self.player.last_move_ms = now - self.config.move_interval_ms;
        self.combo.record_move(now);
    }

    /// Level over (won or lost); no more ticks will run
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::LevelComplete | GamePhase::GameOver)
    }

    pub fn area_revealed(&self) -> f32 {
        self.grid.revealed_percent()
    }

    /// Current stats (not yet published)
    pub fn current_stats(&self) -> Stats {
        let elapsed_ms = if matches!(self.phase, GamePhase::Intro(_)) {
            0.0
        } else {
            self.clock.now() - self.play_started_ms
        };
        Stats {
            area_revealed: self.area_revealed(),
            elapsed_ms,
            score: self.score,
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
