//! Data-driven game balance
//!
//! All physics and layout constants live in one immutable `Tuning` value that
//! is handed to the simulation. Lengths are in `vw` (percent of viewport
//! width), time is in milliseconds, so forces are per-ms² and very small.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Default downward acceleration (dt is in milliseconds, hence tiny)
pub const FORCE_GRAVITY: f64 = 4.5 / 100_000.0;

/// Physics and layout constants for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Forces ===
    /// Downward acceleration applied every flight tick
    pub gravity_force: f64,
    /// Upward acceleration while the engine is on
    pub engine_force: f64,
    /// Strength of the wind's pull on horizontal velocity
    pub drag_coeff: f64,
    /// Fraction of horizontal velocity lost per tick while landed
    pub friction_coeff: f64,

    // === Thresholds ===
    /// Maximum descent speed for a safe landing
    pub crash_velocity: f64,
    /// Ceiling above which the vehicle is lost
    pub max_altitude: f64,
    /// Horizontal speed below which a landed vehicle counts as stopped
    pub zero_velocity_eps: f64,

    // === Layout ===
    pub scene_width: f64,
    pub scene_height: f64,
    pub platform_left: f64,
    pub platform_width: f64,
    pub vehicle_width: f64,
    pub vehicle_height: f64,
    pub coin_width: f64,
    pub coin_height: f64,

    // === Progression ===
    /// Score awarded per coin
    pub coin_score: u64,
    /// Wind target velocity at the start of a game
    pub wind_initial: f64,
    /// Wind added after every collect-and-land cycle
    pub wind_increment: f64,

    // === Spawn ===
    pub start_position: DVec2,
    pub start_coin: DVec2,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_force: FORCE_GRAVITY,
            engine_force: 2.5 * FORCE_GRAVITY,
            drag_coeff: 0.01,
            friction_coeff: 0.1,

            crash_velocity: 0.04,
            max_altitude: 60.0,
            zero_velocity_eps: 0.001,

            scene_width: 100.0,
            scene_height: 60.0,
            platform_left: 30.0,
            platform_width: 30.0,
            vehicle_width: 10.0,
            vehicle_height: 6.0,
            coin_width: 4.0,
            coin_height: 4.0,

            coin_score: 10,
            wind_initial: 0.01,
            wind_increment: 0.005,

            start_position: DVec2::new(40.0, 20.0),
            start_coin: DVec2::new(15.0, 30.0),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> SimResult<Self> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every value is usable by the simulation
    pub fn validate(&self) -> SimResult<()> {
        let finite = [
            ("gravity_force", self.gravity_force),
            ("engine_force", self.engine_force),
            ("drag_coeff", self.drag_coeff),
            ("friction_coeff", self.friction_coeff),
            ("crash_velocity", self.crash_velocity),
            ("max_altitude", self.max_altitude),
            ("zero_velocity_eps", self.zero_velocity_eps),
            ("platform_left", self.platform_left),
            ("wind_initial", self.wind_initial),
            ("wind_increment", self.wind_increment),
            ("start_position", self.start_position.x + self.start_position.y),
            ("start_coin", self.start_coin.x + self.start_coin.y),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }

        let positive = [
            ("scene_width", self.scene_width),
            ("scene_height", self.scene_height),
            ("platform_width", self.platform_width),
            ("vehicle_width", self.vehicle_width),
            ("vehicle_height", self.vehicle_height),
            ("coin_width", self.coin_width),
            ("coin_height", self.coin_height),
            ("crash_velocity", self.crash_velocity),
            ("max_altitude", self.max_altitude),
            ("zero_velocity_eps", self.zero_velocity_eps),
        ];
        for (field, value) in positive {
            // NaN fails this comparison too
            if !(value > 0.0 && value.is_finite()) {
                return Err(invalid(field, "must be a positive number"));
            }
        }

        if !(0.0..=1.0).contains(&self.friction_coeff) {
            return Err(invalid("friction_coeff", "must be within [0, 1]"));
        }
        if self.gravity_force < 0.0 || self.engine_force < 0.0 || self.drag_coeff < 0.0 {
            return Err(invalid("forces", "must not be negative"));
        }
        if self.wind_increment < 0.0 {
            return Err(invalid("wind_increment", "must not be negative"));
        }

        // Spawn points must already satisfy the position invariants, since
        // paused ticks never wrap or clamp them
        let start = self.start_position;
        if !(0.0..self.scene_width).contains(&start.x) {
            return Err(invalid("start_position", "x must be within [0, scene_width)"));
        }
        if !(0.0..=self.max_altitude).contains(&start.y) {
            return Err(invalid("start_position", "y must be within [0, max_altitude]"));
        }
        // Coin respawns are taken modulo these spans
        let coin = self.start_coin;
        if !(0.0..0.9 * self.scene_width).contains(&coin.x)
            || !(0.0..0.9 * self.scene_height).contains(&coin.y)
        {
            return Err(invalid(
                "start_coin",
                "must be within [0, 0.9 * scene_width) x [0, 0.9 * scene_height)",
            ));
        }

        Ok(())
    }

    /// Left edge of the landing window (vehicle x may overhang by half its width)
    pub fn landing_min_x(&self) -> f64 {
        self.platform_left - self.vehicle_width / 2.0
    }

    /// Right edge of the landing window
    pub fn landing_max_x(&self) -> f64 {
        self.platform_left + self.platform_width - self.vehicle_width / 2.0
    }
}

fn invalid(field: &'static str, reason: &str) -> SimError {
    SimError::InvalidTuning {
        field,
        reason: reason.to_string(),
    }
}
