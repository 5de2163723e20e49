//! Pause-aware simulation clock
//!
//! Every timestamp in the engine (invulnerability, combo, items, intro) is read
//! from here. The clock only advances through [`SimClock::advance`], which is a
//! no-op while paused or stopped, so resuming never makes time "jump".

use serde::{Deserialize, Serialize};

use crate::consts::MAX_FRAME_MS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    now_ms: f64,
    paused: bool,
    stopped: bool,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time (ms)
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Accumulate a frame delta. Clamped so a stalled frame can't skip timers.
    pub fn advance(&mut self, dt_ms: f64) {
        if self.paused || self.stopped {
            return;
        }
        self.now_ms += dt_ms.clamp(0.0, MAX_FRAME_MS);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Permanently stop (level complete / game over)
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// True once `deadline_ms` has been reached
    pub fn reached(&self, deadline_ms: f64) -> bool {
        self.now_ms >= deadline_ms
    }
}
