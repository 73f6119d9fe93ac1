//! Coin Lander - A vehicle-landing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, landing/crash rules, coin pickup)
//! - `tuning`: Data-driven game balance
//! - `game_loop`: Single-threaded driver feeding commands and ticks to the sim
//! - `highscores`: Best/last score persistence
//! - `autopilot`: Demo controller for idle mode and the native runner

pub mod autopilot;
pub mod error;
pub mod game_loop;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use autopilot::Autopilot;
pub use error::{SimError, SimResult};
pub use game_loop::GameLoop;
pub use highscores::ScoreBook;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame interval (ms) at 60 Hz
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Simulated duration of a headless demo run (ms)
    pub const DEMO_DURATION_MS: f64 = 120_000.0;
}
