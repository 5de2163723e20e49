//! Level progression and the continue countdown
//!
//! A [`Session`] owns the running [`SimulationState`], starts the next level
//! when one is cleared, and after a game over offers a timed continue.

use serde::{Deserialize, Serialize};

use crate::config::LevelConfig;
use crate::consts::CONTINUE_WINDOW_MS;
use crate::sim::{GameEvent, GamePhase, SimClock, SimulationState, TickInput, tick};

/// Where the session is at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// A level is being played (including its intro)
    Running,
    /// Game over; the player may continue until `deadline_ms` (session clock)
    ContinueOffer { deadline_ms: f64 },
    /// Continue declined or timed out
    Over,
}

pub struct Session {
    pub state: SimulationState,
    pub phase: SessionPhase,
    /// Score banked from cleared levels
    pub total_score: u64,
    base: LevelConfig,
    seed: u64,
    /// Attempts at the current level (bumped by each continue)
    attempt: u32,
    /// Drives the continue countdown; pauses with the game
    clock: SimClock,
}

impl Session {
    /// New session at level 1 with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_base(LevelConfig::default(), seed)
    }

    /// New session whose levels are scaled from `base`
    pub fn with_base(base: LevelConfig, seed: u64) -> Self {
        let state = SimulationState::new(base.scaled(1), 1, level_seed(seed, 1, 0));
        Self {
            state,
            phase: SessionPhase::Running,
            total_score: 0,
            base,
            seed,
            attempt: 0,
            clock: SimClock::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    /// Banked score plus the current level's score
    pub fn score(&self) -> u64 {
        self.total_score + self.state.score
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::Over
    }

    /// Run one frame; returns the events the level produced
    pub fn frame(&mut self, input: &TickInput, dt_ms: f64) -> Vec<GameEvent> {
        match self.phase {
            SessionPhase::Running => {
                tick(&mut self.state, input, dt_ms);
                // Follow the level's own pause state
                self.clock.set_paused(self.state.phase == GamePhase::Paused);
                self.clock.advance(dt_ms);
                let events = self.state.drain_events();
                for event in &events {
                    match event {
                        GameEvent::LevelComplete(_) => self.advance_level(),
                        GameEvent::GameOver(_) => {
                            let deadline_ms = self.clock.now() + CONTINUE_WINDOW_MS;
                            log::info!("Continue offered for {:.0}ms", CONTINUE_WINDOW_MS);
                            self.phase = SessionPhase::ContinueOffer { deadline_ms };
                        }
                        _ => {}
                    }
                }
                events
            }
            SessionPhase::ContinueOffer { deadline_ms } => {
                if input.pause {
                    self.clock.set_paused(!self.clock.is_paused());
                }
                self.clock.advance(dt_ms);
                if self.clock.reached(deadline_ms) {
                    log::info!("Continue expired, final score {}", self.score());
                    self.phase = SessionPhase::Over;
                }
                Vec::new()
            }
            SessionPhase::Over => Vec::new(),
        }
    }

    /// Seconds left to accept a continue, if one is on offer
    pub fn continue_remaining_ms(&self) -> Option<f64> {
        match self.phase {
            SessionPhase::ContinueOffer { deadline_ms } => Some((deadline_ms - self.clock.now()).max(0.0)),
            _ => None,
        }
    }

    /// Restart the current level with full lives. The level's own score is
    /// forfeited; banked score is kept. Returns false if nothing was on offer.
    pub fn accept_continue(&mut self) -> bool {
        let SessionPhase::ContinueOffer { deadline_ms } = self.phase else {
            return false;
        };
        if self.clock.reached(deadline_ms) {
            return false;
        }
        self.attempt += 1;
        let level = self.state.level;
        log::info!("Continuing level {} (attempt {})", level, self.attempt + 1);
        self.state = SimulationState::new(self.base.scaled(level), level, level_seed(self.seed, level, self.attempt));
        self.phase = SessionPhase::Running;
        self.clock.set_paused(false);
        true
    }

    /// Give up on the continue offer
    pub fn decline_continue(&mut self) {
        if matches!(self.phase, SessionPhase::ContinueOffer { .. }) {
            self.phase = SessionPhase::Over;
        }
    }

    fn advance_level(&mut self) {
        self.total_score += self.state.score;
        let level = self.state.level + 1;
        self.attempt = 0;
        log::info!("Advancing to level {} (banked score {})", level, self.total_score);
        self.state = SimulationState::new(self.base.scaled(level), level, level_seed(self.seed, level, 0));
        self.clock.set_paused(false);
    }
}

/// Per-level seed derived from the run seed
fn level_seed(seed: u64, level: u32, attempt: u32) -> u64 {
    seed.wrapping_add((level as u64).wrapping_mul(2654435761))
        .wrapping_add((attempt as u64).wrapping_mul(40503))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Adversary, Direction};
    use glam::Vec2;

    fn skip() -> TickInput {
        TickInput {
            skip_intro: true,
            ..Default::default()
        }
    }

    /// Put the lone adversary right next to the spawn corner
    fn doom(session: &mut Session) {
        session.state.player.invulnerable_until_ms = 0.0;
        session.state.adversaries = vec![Adversary::new(1, Vec2::new(1.5, 1.5), Vec2::ZERO)];
    }

    fn lose_all_lives(session: &mut Session) -> Vec<GameEvent> {
        session.frame(&skip(), 16.0);
        let mut events = Vec::new();
        for _ in 0..3 {
            doom(session);
            events.extend(session.frame(&TickInput::default(), 16.0));
        }
        events
    }

    #[test]
    fn test_game_over_offers_continue() {
        let mut session = Session::new(7);
        let events = lose_all_lives(&mut session);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver(_))));
        assert!(matches!(session.phase, SessionPhase::ContinueOffer { .. }));
        assert_eq!(session.continue_remaining_ms(), Some(CONTINUE_WINDOW_MS));
    }

    #[test]
    fn test_continue_restarts_level() {
        let mut session = Session::new(7);
        lose_all_lives(&mut session);
        session.frame(&TickInput::default(), 50.0);

        assert!(session.accept_continue());
        assert_eq!(session.phase, SessionPhase::Running);
        assert_eq!(session.level(), 1);
        assert_eq!(session.state.player.lives, 3);
        assert_eq!(session.state.phase, GamePhase::Intro(crate::sim::IntroStage::Ready));
        assert!(!session.accept_continue());
    }

    #[test]
    fn test_continue_window_expires() {
        let mut session = Session::new(7);
        lose_all_lives(&mut session);
        for _ in 0..100 {
            session.frame(&TickInput::default(), 100.0);
        }
        assert!(session.is_over());
        assert!(!session.accept_continue());
    }

    #[test]
    fn test_pause_holds_continue_countdown() {
        let mut session = Session::new(7);
        lose_all_lives(&mut session);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        session.frame(&pause, 16.0);
        for _ in 0..200 {
            session.frame(&TickInput::default(), 100.0);
        }
        assert!(matches!(session.phase, SessionPhase::ContinueOffer { .. }));
        assert_eq!(session.continue_remaining_ms(), Some(CONTINUE_WINDOW_MS));
    }

    #[test]
    fn test_pause_during_offer_does_not_leak_into_next_attempt() {
        let mut session = Session::new(7);
        lose_all_lives(&mut session);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        session.frame(&pause, 16.0);
        assert!(session.accept_continue());

        lose_all_lives(&mut session);
        assert!(matches!(session.phase, SessionPhase::ContinueOffer { .. }));
        for _ in 0..200 {
            session.frame(&TickInput::default(), 100.0);
        }
        assert!(session.is_over());
    }

    #[test]
    fn test_level_pause_holds_session_clock() {
        let mut session = Session::new(7);
        session.frame(&skip(), 16.0);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        session.frame(&pause, 16.0);
        assert_eq!(session.state.phase, GamePhase::Paused);
        let now = session.clock.now();
        for _ in 0..50 {
            session.frame(&TickInput::default(), 100.0);
        }
        assert_eq!(session.clock.now(), now);

        session.frame(&pause, 16.0);
        assert_eq!(session.state.phase, GamePhase::Playing);
        assert!(session.clock.now() > now);
    }

    #[test]
    fn test_cleared_level_advances() {
        let base = LevelConfig {
            grid_width: 10,
            grid_height: 8,
            item_spawn_chance: 0.0,
            // Border alone is 32 of 80 tiles; any capture clears the level
            min_reveal_percent: 41.0,
            ..LevelConfig::default()
        };
        let mut session = Session::with_base(base, 3);
        session.frame(&skip(), 0.0);
        session.state.adversaries = vec![Adversary::new(1, Vec2::new(7.5, 4.5), Vec2::ZERO)];

        let mut cleared = false;
        for (direction, n) in [(Direction::Right, 3), (Direction::Down, 7)] {
            for _ in 0..n {
                let events = session.frame(
                    &TickInput {
                        direction,
                        ..Default::default()
                    },
                    60.0,
                );
                cleared |= events.iter().any(|e| matches!(e, GameEvent::LevelComplete(_)));
            }
        }

        assert!(cleared);
        assert_eq!(session.level(), 2);
        assert_eq!(session.total_score, 120);
        assert_eq!(session.state.score, 0);
        assert_eq!(session.score(), 120);
    }

    #[test]
    fn test_level_seeds_differ() {
        assert_ne!(level_seed(1, 1, 0), level_seed(1, 2, 0));
        assert_ne!(level_seed(1, 1, 0), level_seed(1, 1, 1));
    }
}
