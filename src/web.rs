//! Browser bindings
//!
//! The page owns rendering, audio and input; it calls [`WebSession::frame`]
//! from its `requestAnimationFrame` loop and reads events/snapshots as JSON.

use wasm_bindgen::prelude::*;

use crate::config::LevelConfig;
use crate::session::Session;
use crate::sim::{Direction, TickInput};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed (module re-instantiated)
        return;
    }
    log::info!("Trail Carver engine loaded");
}

#[wasm_bindgen]
pub struct WebSession {
    session: Session,
    /// Pause toggle requested since the last frame
    pause_requested: bool,
    skip_intro_requested: bool,
}

#[wasm_bindgen]
impl WebSession {
    /// New session with default tuning, seeded from the current time
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebSession {
        let seed = js_sys::Date::now() as u64;
        log::info!("Session initialized with seed: {}", seed);
        Self::wrap(Session::new(seed))
    }

    /// New session from a JSON `LevelConfig` (missing fields use defaults)
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<WebSession, JsValue> {
        let base = LevelConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let seed = js_sys::Date::now() as u64;
        Ok(Self::wrap(Session::with_base(base, seed)))
    }

    /// Run one frame with the held direction (`dx`, `dy` in -1..=1).
    /// Returns this frame's events as a JSON array.
    pub fn frame(&mut self, dx: i32, dy: i32, dt_ms: f64) -> String {
        let input = TickInput {
            direction: Direction::from_delta(dx, dy),
            pause: std::mem::take(&mut self.pause_requested),
            skip_intro: std::mem::take(&mut self.skip_intro_requested),
        };
        let events = self.session.frame(&input, dt_ms);
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Event serialization failed: {}", e);
            "[]".to_string()
        })
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) {
        self.pause_requested = !self.pause_requested;
    }

    #[wasm_bindgen(js_name = skipIntro)]
    pub fn skip_intro(&mut self) {
        self.skip_intro_requested = true;
    }

    #[wasm_bindgen(js_name = acceptContinue)]
    pub fn accept_continue(&mut self) -> bool {
        self.session.accept_continue()
    }

    #[wasm_bindgen(js_name = declineContinue)]
    pub fn decline_continue(&mut self) {
        self.session.decline_continue();
    }

    /// Milliseconds left on the continue offer, or -1 when none is open
    #[wasm_bindgen(js_name = continueRemaining)]
    pub fn continue_remaining(&self) -> f64 {
        self.session.continue_remaining_ms().unwrap_or(-1.0)
    }

    pub fn level(&self) -> u32 {
        self.session.level()
    }

    pub fn score(&self) -> f64 {
        self.session.score() as f64
    }

    /// Full post-tick state of the current level as JSON
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.session.state).unwrap_or_else(|e| {
            log::warn!("Snapshot serialization failed: {}", e);
            "null".to_string()
        })
    }

    /// Active tile flashes (not part of the snapshot)
    #[wasm_bindgen(js_name = flashesJson)]
    pub fn flashes_json(&self) -> String {
        serde_json::to_string(&self.session.state.flashes).unwrap_or_else(|_| "[]".to_string())
    }
}

impl WebSession {
    fn wrap(session: Session) -> WebSession {
        WebSession {
            session,
            pause_requested: false,
            skip_intro_requested: false,
        }
    }
}

impl Default for WebSession {
    fn default() -> Self {
        Self::new()
    }
}
