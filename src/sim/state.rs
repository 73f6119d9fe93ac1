//! Game state and core simulation types
//!
//! The whole game is one small value: a vehicle, a coin and the wind. Every
//! transition produces a fresh `SimulationState`; nothing is shared.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// True until the engine is started for the first time in an episode
    pub paused: bool,
    /// Lift is applied while true
    pub engine_on: bool,
    /// Timestamp (ms) of the last processed tick
    pub last_timestamp: f64,
    /// Vehicle bottom-left corner; x wraps within the scene width
    pub pos: DVec2,
    /// Vehicle velocity (vw/ms)
    pub vel: DVec2,
    /// Horizontal velocity the wind drags the vehicle toward
    pub wind_velocity_x: f64,
    pub coin_visible: bool,
    /// Coin bottom-left corner
    pub coin: DVec2,
    pub score: u64,
}

impl SimulationState {
    /// Fresh episode for the given tuning
    pub fn initial(tuning: &Tuning) -> Self {
        Self {
            paused: true,
            engine_on: false,
            last_timestamp: 0.0,
            pos: tuning.start_position,
            vel: DVec2::ZERO,
            wind_velocity_x: tuning.wind_initial,
            coin_visible: true,
            coin: tuning.start_coin,
            score: 0,
        }
    }

    /// Fresh episode that keeps the clock, so the next tick has a small dt
    pub fn initial_at(tuning: &Tuning, last_timestamp: f64) -> Self {
        Self {
            last_timestamp,
            ..Self::initial(tuning)
        }
    }

    /// Vehicle is resting on the ground
    pub fn is_grounded(&self) -> bool {
        self.pos.y == 0.0
    }

    /// Vehicle counts as stopped for coin respawn purposes
    pub fn is_settled(&self, tuning: &Tuning) -> bool {
        self.is_grounded() && self.vel.x.abs() < tuning.zero_velocity_eps
    }

    /// Vehicle's horizontal position lies over the platform
    pub fn over_platform(&self, tuning: &Tuning) -> bool {
        (tuning.landing_min_x()..=tuning.landing_max_x()).contains(&self.pos.x)
    }

    /// Pretty-printed JSON dump for the debug panel
    pub fn debug_json(&self) -> String {
        // Only plain numbers and bools, so serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Notable things that happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Vehicle touched down on the platform
    Landed,
    /// Coin picked up; carries the new score
    CoinCollected { score: u64 },
    /// New coin placed after a collect-and-land cycle; carries the new wind
    CoinRespawned { wind: f64 },
    /// Episode ended; carries the score that was lost
    Crashed { score: u64 },
}
