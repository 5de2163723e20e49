//! Trail Carver entry point
//!
//! Native: runs a headless session driven by a simple autopilot and logs what
//! happens. The browser build is driven from JS through `trail_carver::web`.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::{SystemTime, UNIX_EPOCH};

    use trail_carver::Session;
    use trail_carver::sim::{Direction, GameEvent, SimulationState, TickInput};

    /// ~60 fps frame
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Stop after ten minutes of simulated frames
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    /// Columns between two cuts
    const CUT_SPACING: u32 = 4;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Leg {
        Across,
        Down,
        Up,
    }

    /// Sweeps vertical cuts from the top border to the bottom border
    struct Autopilot {
        column: u32,
        leg: Leg,
        lives: u8,
    }

    impl Autopilot {
        fn new(lives: u8) -> Self {
            Self {
                column: CUT_SPACING,
                leg: Leg::Across,
                lives,
            }
        }

        fn steer(&mut self, state: &SimulationState) -> Direction {
            let pos = state.player.pos;
            let bottom = state.grid.height() - 1;
            let right = state.grid.width() - 1;

            // Respawned at the corner after a death
            if state.player.lives != self.lives {
                self.lives = state.player.lives;
                self.leg = Leg::Across;
            }

            match self.leg {
                Leg::Across => {
                    if pos.x < self.column {
                        Direction::Right
                    } else if pos.x > self.column {
                        Direction::Left
                    } else {
                        self.leg = Leg::Down;
                        Direction::Down
                    }
                }
                Leg::Down => {
                    if pos.y < bottom {
                        Direction::Down
                    } else {
                        self.leg = Leg::Up;
                        Direction::Up
                    }
                }
                Leg::Up => {
                    if pos.y > 0 {
                        Direction::Up
                    } else {
                        self.column += CUT_SPACING;
                        if self.column >= right {
                            self.column = CUT_SPACING / 2;
                        }
                        self.leg = Leg::Across;
                        Direction::Right
                    }
                }
            }
        }
    }

    pub fn run() {
        env_logger::init();
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        log::info!("Trail Carver (native) starting with seed {}", seed);

        let mut session = Session::new(seed);
        let mut pilot = Autopilot::new(session.state.player.lives);

        for frame in 0..MAX_FRAMES {
            if let Some(remaining) = session.continue_remaining_ms() {
                log::info!("Accepting continue ({:.0}ms left)", remaining);
                if !session.accept_continue() {
                    break;
                }
                pilot = Autopilot::new(session.state.player.lives);
            }

            let input = TickInput {
                direction: pilot.steer(&session.state),
                skip_intro: frame == 0,
                ..Default::default()
            };

            for event in session.frame(&input, FRAME_MS) {
                match event {
                    GameEvent::AreaCaptured { tiles, points, combo } => {
                        log::info!("Captured {} tiles (+{}, combo x{})", tiles, points, combo)
                    }
                    GameEvent::PlayerDied { cause, at } => log::info!("Died at {:?}: {:?}", at, cause),
                    GameEvent::LevelComplete(stats) => {
                        log::info!(
                            "Level cleared: {:.1}% in {:.1}s, score {}",
                            stats.area_revealed,
                            stats.elapsed_ms / 1000.0,
                            stats.score
                        );
                        pilot = Autopilot::new(session.state.player.lives);
                    }
                    GameEvent::GameOver(stats) => log::info!("Game over with score {}", stats.score),
                    _ => {}
                }
            }

            if session.is_over() {
                break;
            }
        }

        log::info!(
            "Session finished on level {} with score {}",
            session.level(),
            session.score()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is trail_carver::web::start, this is just to satisfy the compiler
}
