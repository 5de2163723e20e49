//! Combo / scoring state machine
//!
//! `Idle` while the streak is 1, `Active` above that. Any capture extends the
//! streak; standing still too long or going too long without a capture breaks it.

use serde::{Deserialize, Serialize};

use crate::consts::{COMBO_MILESTONE, POINTS_PER_TILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComboPhase {
    Idle,
    Active,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    /// Streak count, never below 1
    count: u32,
    /// Sim time of the last capture (ms)
    last_capture_ms: f64,
    /// Sim time of the last player step (ms)
    last_move_ms: f64,
}

impl Default for Combo {
    fn default() -> Self {
        Self {
            count: 1,
            last_capture_ms: 0.0,
            last_move_ms: 0.0,
        }
    }
}

impl Combo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn phase(&self) -> ComboPhase {
        if self.count > 1 {
            ComboPhase::Active
        } else {
            ComboPhase::Idle
        }
    }

    /// Score for `tiles` captured at the current multiplier
    pub fn score_for(&self, tiles: usize) -> u64 {
        POINTS_PER_TILE * self.count as u64 * tiles as u64
    }

    pub fn record_move(&mut self, now_ms: f64) {
        self.last_move_ms = now_ms;
    }

    /// Extend the streak. Returns true when the new count is a milestone.
    pub fn record_capture(&mut self, now_ms: f64) -> bool {
        self.count += 1;
        self.last_capture_ms = now_ms;
        self.count % COMBO_MILESTONE == 0
    }

    /// Break the streak if either timeout has elapsed.
    ///
    /// Returns true exactly once per break.
    pub fn check_timeouts(&mut self, now_ms: f64, idle_timeout_ms: f64, combo_timeout_ms: f64) -> bool {
        if self.phase() == ComboPhase::Idle {
            return false;
        }
        let idle = now_ms - self.last_move_ms > idle_timeout_ms;
        let stale = now_ms - self.last_capture_ms > combo_timeout_ms;
        if idle || stale {
            self.count = 1;
            return true;
        }
        false
    }

    /// Drop back to 1. Returns true if a streak was actually broken.
    pub fn reset(&mut self) -> bool {
        let was_active = self.phase() == ComboPhase::Active;
        self.count = 1;
        was_active
    }
}
