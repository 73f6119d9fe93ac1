//! Demo autopilot
//!
//! Plays the game through the same command stream a human would use: it only
//! ever toggles the engine. While a coin is out it hovers at the coin's
//! altitude and lets the wind carry it in; once the coin is taken it cruises
//! until it is over the platform, then sinks onto it below crash speed.

use crate::consts::FRAME_MS;
use crate::sim::{Command, SimulationState};
use crate::tuning::Tuning;

/// Altitude below which the engine is cut for the final drop onto the pad
const FLARE_ALTITUDE: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Holding altitude while waiting to drift over the platform
    pub cruise_altitude: f64,
    /// Descent speed as a fraction of the crash velocity
    pub descent_ratio: f64,
    /// Vertical speed requested per vw of altitude error
    pub gain: f64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            cruise_altitude: 15.0,
            descent_ratio: 0.4,
            gain: 0.002,
        }
    }
}

impl Autopilot {
    /// Command needed to bring the engine into the wanted state, if any
    pub fn decide(&self, state: &SimulationState, tuning: &Tuning) -> Option<Command> {
        if state.paused {
            return Some(Command::StartEngine);
        }

        let want_engine = self.want_engine(state, tuning);
        match (want_engine, state.engine_on) {
            (true, false) => Some(Command::StartEngine),
            (false, true) => Some(Command::StopEngine),
            _ => None,
        }
    }

    /// Command that hands control back to the player, if one is needed.
    /// The engine is cut so it does not stay on with no key held.
    pub fn disengage(&self, state: &SimulationState) -> Option<Command> {
        state.engine_on.then_some(Command::StopEngine)
    }

    fn want_engine(&self, state: &SimulationState, tuning: &Tuning) -> bool {
        let descent_speed = self.descent_ratio * tuning.crash_velocity;

        let target_vy = if state.coin_visible {
            // Straddle the coin vertically
            let target = state.coin.y + (tuning.coin_height - tuning.vehicle_height) / 2.0;
            self.hold(state, target, descent_speed, tuning)
        } else if state.is_grounded() {
            // Let friction stop the vehicle so the next coin appears
            return false;
        } else if self.can_descend(state, descent_speed, tuning) {
            if state.pos.y < FLARE_ALTITUDE {
                return false;
            }
            -descent_speed
        } else {
            self.hold(state, self.cruise_altitude, descent_speed, tuning)
        };

        state.vel.y < target_vy
    }

    /// Vertical speed that steers toward `altitude`
    fn hold(&self, state: &SimulationState, altitude: f64, max_speed: f64, tuning: &Tuning) -> f64 {
        let ceiling = tuning.max_altitude - tuning.vehicle_height;
        let altitude = altitude.max(FLARE_ALTITUDE * 2.0).min(ceiling);
        ((altitude - state.pos.y) * self.gain).clamp(-max_speed, max_speed)
    }

    /// Over the platform with enough room left to sink onto it
    fn can_descend(&self, state: &SimulationState, descent_speed: f64, tuning: &Tuning) -> bool {
        if !state.over_platform(tuning) {
            return false;
        }
        let time_to_ground = state.pos.y.max(0.0) / descent_speed;
        let touchdown_x = state.pos.x + state.vel.x * time_to_ground;
        // Friction is applied per frame, so the slide is a geometric series
        let stop_x =
            touchdown_x + state.vel.x * FRAME_MS / tuning.friction_coeff.max(f64::EPSILON);
        let window = (tuning.landing_min_x() + 1.0)..=(tuning.landing_max_x() - 1.0);
        window.contains(&touchdown_x) && window.contains(&stop_x)
    }
}
