//! Simulation tick
//!
//! One call per animation frame. Order within a tick is fixed:
//! player movement → adversaries → pickups → stats.

use serde::{Deserialize, Serialize};

use super::capture::close_trail;
use super::grid::{Direction, Tile, TilePos};
use super::pickup::{Pickup, PickupKind, roll_spawn};
use super::state::{DeathCause, Flash, GameEvent, GamePhase, IntroStage, SPAWN_TILE, SimulationState, Stats};
use crate::consts::{CAPTURE_FLASH_MS, TRAIL_FLASH_MS};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held direction (neutral when no key is down)
    pub direction: Direction,
    /// Pause toggle
    pub pause: bool,
    /// Skip the READY/GO intro
    pub skip_intro: bool,
}

/// Advance the level by one frame of `dt_ms` real milliseconds
pub fn tick(state: &mut SimulationState, input: &TickInput, dt_ms: f64) {
    if state.is_finished() {
        return;
    }

    // Handle pause toggle
    if input.pause {
        if state.phase == GamePhase::Paused {
            state.phase = state.resume_phase;
            state.clock.set_paused(false);
            log::debug!("Resumed at {:.0}ms", state.clock.now());
        } else {
            state.resume_phase = state.phase;
            state.phase = GamePhase::Paused;
            state.clock.set_paused(true);
            log::debug!("Paused at {:.0}ms", state.clock.now());
            return;
        }
    }
    if state.phase == GamePhase::Paused {
        return;
    }

    let before = state.clock.now();
    state.clock.advance(dt_ms);
    let now = state.clock.now();
    let dt_secs = ((now - before) / 1000.0) as f32;

    state.flashes.retain(|f| f.expires_ms > now);

    if let GamePhase::Intro(stage) = state.phase {
        if input.skip_intro {
            state.begin_play();
        } else {
            update_intro(state, stage, now);
        }
        return;
    }

    update_player(state, input.direction, now);
    if state.is_finished() {
        return;
    }

    if state
        .combo
        .check_timeouts(now, state.config.idle_timeout_ms, state.config.combo_timeout_ms)
    {
        log::debug!("Combo broken by timeout");
        state.push_event(GameEvent::ComboBroken);
    }

    update_adversaries(state, dt_secs, now);
    if state.is_finished() {
        return;
    }

    update_pickups(state, now);
    publish_stats(state);
}

fn update_intro(state: &mut SimulationState, stage: IntroStage, now: f64) {
    if !state.clock.reached(state.intro_deadline_ms) {
        return;
    }
    match stage {
        IntroStage::Ready => {
            state.phase = GamePhase::Intro(IntroStage::Go);
            state.intro_deadline_ms = now + state.config.intro_go_ms;
            state.push_event(GameEvent::IntroCue(IntroStage::Go));
        }
        IntroStage::Go => state.begin_play(),
    }
}

/// Step the player one tile if the step interval has elapsed
fn update_player(state: &mut SimulationState, direction: Direction, now: f64) {
    if direction == Direction::None {
        return;
    }
    if now - state.player.last_move_ms < state.config.move_interval_ms {
        return;
    }
    // Off-grid steps are silently ignored
    let Some(target) = state.grid.step(state.player.pos, direction) else {
        return;
    };

    state.player.last_move_ms = now;
    state.combo.record_move(now);

    match state.grid.get(target) {
        Tile::Hidden => {
            state.trail.carve(&mut state.grid, target);
            state.player.is_drawing = true;
            state.player.pos = target;
        }
        Tile::Trail => {
            state.player.pos = target;
            kill_player(state, DeathCause::SelfCrossing, now);
        }
        Tile::Revealed => {
            state.player.pos = target;
            if state.player.is_drawing {
                close_loop(state, now);
            }
        }
    }
}

/// Seal the trail and capture everything no adversary can reach
fn close_loop(state: &mut SimulationState, now: f64) {
    let trail = state.trail.take();
    let result = close_trail(&mut state.grid, trail, state.adversaries.iter().map(|a| a.pos));
    state.player.is_drawing = false;

    state.flashes.extend(result.captured.iter().map(|&tile| Flash {
        tile,
        strength: 1.0,
        expires_ms: now + CAPTURE_FLASH_MS,
    }));
    state.flashes.extend(result.sealed.iter().map(|&tile| Flash {
        tile,
        strength: 0.4,
        expires_ms: now + TRAIL_FLASH_MS,
    }));

    let tiles = result.captured_count();
    if tiles > 0 {
        let points = state.combo.score_for(tiles);
        state.score += points;
        let milestone = state.combo.record_capture(now);
        let combo = state.combo.count();
        log::debug!("Captured {} tiles for {} points (combo x{})", tiles, points, combo);
        state.push_event(GameEvent::AreaCaptured { tiles, points, combo });
        if milestone {
            state.push_event(GameEvent::ComboMilestone { combo });
        }
    }

    if state.area_revealed() >= state.config.min_reveal_percent {
        let stats = publish_stats(state);
        state.phase = GamePhase::LevelComplete;
        state.clock.stop();
        log::info!(
            "Level {} complete: {:.1}% revealed, score {}",
            state.level,
            stats.area_revealed,
            stats.score
        );
        state.push_event(GameEvent::LevelComplete(stats));
    }
}

/// Life-loss protocol. Ignored while invulnerable; returns whether it applied.
fn kill_player(state: &mut SimulationState, cause: DeathCause, now: f64) -> bool {
    if state.player.is_invulnerable(now) {
        return false;
    }

    let at = state.player.pos;
    state.trail.revert(&mut state.grid);
    state.player.is_drawing = false;
    if state.combo.reset() {
        state.push_event(GameEvent::ComboBroken);
    }

    state.player.lives = state.player.lives.saturating_sub(1);
    state.player.pos = SPAWN_TILE;
    let lives = state.player.lives;
    log::debug!("Player died ({:?}) at {:?}, {} lives left", cause, at, lives);
    state.push_event(GameEvent::LivesChanged { lives });
    state.push_event(GameEvent::PlayerDied { cause, at });

    if lives == 0 {
        state.phase = GamePhase::GameOver;
        state.clock.stop();
        // Stats as last published, before the fatal tick
        let stats = state.stats;
        log::info!("Game over on level {}: score {}", state.level, stats.score);
        state.push_event(GameEvent::GameOver(stats));
    } else {
        state.player.invulnerable_until_ms = now + state.config.invulnerability_ms;
    }
    true
}

fn update_adversaries(state: &mut SimulationState, dt_secs: f32, now: f64) {
    for adversary in &mut state.adversaries {
        adversary.step(&state.grid, dt_secs);
    }

    if state.player.is_invulnerable(now) {
        return;
    }

    let player = state.player.center();
    let radius = state.config.contact_radius;
    let cause = state.adversaries.iter().find_map(|a| {
        if a.on_trail(&state.grid) {
            Some(DeathCause::TrailCut)
        } else if a.touches(player, radius) {
            Some(DeathCause::Contact)
        } else {
            None
        }
    });

    if let Some(cause) = cause {
        kill_player(state, cause, now);
    }
}

fn update_pickups(state: &mut SimulationState, now: f64) {
    state.pickups.retain(|p| !p.is_expired(now));

    if let Some(tile) = roll_spawn(
        &mut state.rng,
        &state.grid,
        state.pickups.len(),
        state.config.max_items,
        state.config.item_spawn_chance,
    ) {
        let id = state.next_entity_id();
        log::debug!("Pickup {} spawned at {:?}", id, tile);
        state.pickups.push(Pickup {
            id,
            kind: PickupKind::ScoreBonus,
            tile,
            spawned_ms: now,
            lifetime_ms: state.config.item_lifetime_ms,
        });
    }

    // At most one collection per tick
    let player = state.player.center();
    let radius = state.config.item_collect_radius;
    if let Some(i) = state
        .pickups
        .iter()
        .position(|p| p.center().distance(player) < radius)
    {
        let item = state.pickups.remove(i);
        let bonus = state.config.item_bonus;
        state.score += bonus;
        state.push_event(GameEvent::ItemCollected { tile: item.tile, bonus });
    }
}

fn publish_stats(state: &mut SimulationState) -> Stats {
    let stats = state.current_stats();
    state.stats = stats;
    state.push_event(GameEvent::Stats(stats));
    stats
}

/// Trail tiles currently in flight (for renderers)
pub fn trail_tiles(state: &SimulationState) -> &[TilePos] {
    state.trail.tiles()
}
