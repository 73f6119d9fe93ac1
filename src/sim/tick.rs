//! State transition: commands in, fresh state out
//!
//! A tick resolves exactly one branch, checked in this order:
//! 1. paused: only the clock moves
//! 2. coin respawn: coin collected and vehicle stopped on the ground
//! 3. landing: engine off, at/below ground, over the platform, slow enough
//! 4. crash: below ground or above the ceiling, back to the initial state
//! 5. free flight: lift, gravity and wind drag
//!
//! Respawn is checked before landing because both hold after a
//! collect-then-land cycle. Crash is checked after landing because a landed
//! vehicle sits at y == 0.
//!
//! Coin pickup is tested afterwards against the geometry the frame started
//! with, not the freshly integrated positions.

use super::collision::{next_coin_position, vehicle_coin_overlap, wrap};
use super::command::Command;
use super::state::{GameEvent, SimulationState};
use crate::error::SimResult;
use crate::tuning::Tuning;

/// The simulation engine: immutable tuning plus pure transition functions
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    tuning: Tuning,
}

impl Simulation {
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// State at the start of an episode
    pub fn initial(&self) -> SimulationState {
        SimulationState::initial(&self.tuning)
    }

    /// Apply one command and return the next state
    pub fn apply(&self, state: &SimulationState, command: Command) -> SimulationState {
        self.step(state, command).0
    }

    /// Apply one command, also reporting what happened
    pub fn step(
        &self,
        state: &SimulationState,
        command: Command,
    ) -> (SimulationState, Vec<GameEvent>) {
        let mut events = Vec::new();
        let next = match command {
            Command::Tick { timestamp } => tick(state, timestamp, &self.tuning, &mut events),
            Command::StartEngine => start_engine(state),
            Command::StopEngine => stop_engine(state),
            Command::Restart => restart(state, &self.tuning),
        };
        (next, events)
    }

    /// Parse a JSON command and apply it
    pub fn dispatch_json(&self, state: &SimulationState, json: &str) -> SimResult<SimulationState> {
        let command = Command::from_json(json)?;
        Ok(self.apply(state, command))
    }
}

fn start_engine(state: &SimulationState) -> SimulationState {
    SimulationState {
        paused: false,
        engine_on: true,
        ..state.clone()
    }
}

fn stop_engine(state: &SimulationState) -> SimulationState {
    SimulationState {
        engine_on: false,
        ..state.clone()
    }
}

fn restart(state: &SimulationState, tuning: &Tuning) -> SimulationState {
    SimulationState::initial_at(tuning, state.last_timestamp)
}

/// Advance the state to `timestamp`
pub fn tick(
    state: &SimulationState,
    timestamp: f64,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> SimulationState {
    // Drivers promise monotonic timestamps; never integrate backwards
    let dt = (timestamp - state.last_timestamp).max(0.0);
    let x = wrap(state.pos.x + dt * state.vel.x, tuning.scene_width);

    if state.paused {
        return SimulationState {
            last_timestamp: timestamp,
            ..state.clone()
        };
    }

    let mut next = if !state.coin_visible && state.is_settled(tuning) {
        respawn_coin(state, x, tuning, events)
    } else if is_landing(state, tuning) {
        land(state, x, tuning, events)
    } else if state.pos.y < 0.0 || state.pos.y > tuning.max_altitude {
        log::info!(
            "Crashed at ({:.1}, {:.1}) vy={:.4}, score {}",
            state.pos.x,
            state.pos.y,
            state.vel.y,
            state.score
        );
        events.push(GameEvent::Crashed { score: state.score });
        return SimulationState::initial_at(tuning, timestamp);
    } else {
        fly(state, x, dt, tuning)
    };

    if state.coin_visible && vehicle_coin_overlap(state.pos, state.coin, tuning) {
        next.coin_visible = false;
        next.score += tuning.coin_score;
        log::debug!("Coin collected, score {}", next.score);
        events.push(GameEvent::CoinCollected { score: next.score });
    }

    next.last_timestamp = timestamp;
    next
}

/// Engine off, at or below ground, over the platform and slow enough
fn is_landing(state: &SimulationState, tuning: &Tuning) -> bool {
    !state.engine_on
        && state.pos.y <= 0.0
        && state.over_platform(tuning)
        && state.vel.y.abs() < tuning.crash_velocity
}

fn respawn_coin(
    state: &SimulationState,
    x: f64,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> SimulationState {
    let wind = state.wind_velocity_x + tuning.wind_increment;
    let coin = next_coin_position(state.coin, tuning);
    log::debug!(
        "Coin respawned at ({:.1}, {:.1}), wind {:.4}",
        coin.x,
        coin.y,
        wind
    );
    events.push(GameEvent::CoinRespawned { wind });

    let mut next = state.clone();
    next.pos.x = x;
    next.vel.x = 0.0;
    next.coin = coin;
    next.coin_visible = true;
    next.wind_velocity_x = wind;
    next
}

fn land(
    state: &SimulationState,
    x: f64,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> SimulationState {
    if !state.is_grounded() || state.vel.y != 0.0 {
        log::debug!("Touchdown at x={:.1}, vy={:.4}", state.pos.x, state.vel.y);
        events.push(GameEvent::Landed);
    }

    let mut next = state.clone();
    next.pos.x = x;
    next.pos.y = 0.0;
    next.vel.x *= 1.0 - tuning.friction_coeff;
    next.vel.y = 0.0;
    next
}

fn fly(state: &SimulationState, x: f64, dt: f64, tuning: &Tuning) -> SimulationState {
    let lift = if state.engine_on {
        tuning.engine_force
    } else {
        0.0
    };
    let vy = state.vel.y + (lift - tuning.gravity_force) * dt;

    // Quadratic drag toward the wind, keeping the sign of the gap
    let rel = state.wind_velocity_x - state.vel.x;
    let vx = state.vel.x + rel * rel.abs() * tuning.drag_coeff * dt;

    let mut next = state.clone();
    next.pos.x = x;
    next.pos.y = state.pos.y + dt * vy;
    next.vel.x = vx;
    next.vel.y = vy;
    next
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::error::SimError;

    const FRAME_MS: f64 = 16.0;

    fn sim() -> Simulation {
        Simulation::default()
    }

    /// Unpaused, engine off, no wind
    fn flying(sim: &Simulation) -> SimulationState {
        SimulationState {
            paused: false,
            wind_velocity_x: 0.0,
            ..sim.initial()
        }
    }

    #[test]
    fn test_start_and_stop_engine() {
        let sim = sim();
        let state = sim.apply(&sim.initial(), Command::StartEngine);
        assert!(!state.paused);
        assert!(state.engine_on);

        let stopped = sim.apply(&state, Command::StopEngine);
        assert!(!stopped.paused);
        assert!(!stopped.engine_on);
        assert_eq!(sim.apply(&stopped, Command::StopEngine), stopped);
    }

    #[test]
    fn test_paused_tick_only_moves_clock() {
        let sim = sim();
        let state = SimulationState {
            vel: DVec2::new(0.02, -0.01),
            ..sim.initial()
        };
        let next = sim.apply(&state, Command::tick(500.0));
        assert_eq!(next.last_timestamp, 500.0);
        assert_eq!(
            SimulationState {
                last_timestamp: state.last_timestamp,
                ..next
            },
            state
        );
    }

    #[test]
    fn test_engine_lifts_vehicle() {
        let sim = sim();
        let mut state = sim.apply(&sim.initial(), Command::StartEngine);
        let mut last_y = state.pos.y;
        for i in 1..=30 {
            state = sim.apply(&state, Command::tick(i as f64 * FRAME_MS));
            assert!(state.pos.y > last_y, "tick {i}: {} <= {last_y}", state.pos.y);
            last_y = state.pos.y;
        }
    }

    #[test]
    fn test_gravity_pulls_down_without_engine() {
        let sim = sim();
        let state = flying(&sim);
        let next = sim.apply(&state, Command::tick(FRAME_MS));
        let expected_vy = -sim.tuning().gravity_force * FRAME_MS;
        assert!((next.vel.y - expected_vy).abs() < 1e-12);
        assert!((next.pos.y - (state.pos.y + FRAME_MS * expected_vy)).abs() < 1e-12);
    }

    #[test]
    fn test_wind_drag_pulls_toward_wind() {
        let sim = sim();
        let state = SimulationState {
            wind_velocity_x: 0.02,
            ..flying(&sim)
        };
        let next = sim.apply(&state, Command::tick(FRAME_MS));
        let expected = 0.02 * 0.02 * sim.tuning().drag_coeff * FRAME_MS;
        assert!((next.vel.x - expected).abs() < 1e-15);

        // Faster than the wind: dragged back
        let state = SimulationState {
            vel: DVec2::new(0.05, 0.0),
            ..state
        };
        let next = sim.apply(&state, Command::tick(FRAME_MS));
        assert!(next.vel.x < 0.05);
        assert!(next.vel.x > 0.02);
    }

    #[test]
    fn test_position_wraps() {
        let sim = sim();
        let state = SimulationState {
            pos: DVec2::new(99.0, 20.0),
            vel: DVec2::new(0.125, 0.0),
            ..flying(&sim)
        };
        let next = sim.apply(&state, Command::tick(FRAME_MS));
        // 99 + 2 wraps to 1
        assert!((next.pos.x - 1.0).abs() < 1e-9);

        let state = SimulationState {
            pos: DVec2::new(0.5, 20.0),
            vel: DVec2::new(-0.125, 0.0),
            ..state
        };
        let next = sim.apply(&state, Command::tick(FRAME_MS));
        assert!((next.pos.x - 98.5).abs() < 1e-9);
    }

    #[test]
    fn test_soft_landing() {
        let sim = sim();
        let state = SimulationState {
            pos: DVec2::new(40.0, -0.1),
            vel: DVec2::new(0.01, -0.02),
            score: 30,
            ..flying(&sim)
        };
        let (next, events) = sim.step(&state, Command::tick(FRAME_MS));
        assert_eq!(next.pos.y, 0.0);
        assert_eq!(next.vel.y, 0.0);
        assert!((next.vel.x - 0.009).abs() < 1e-12);
        assert_eq!(next.score, 30);
        assert_eq!(events, vec![GameEvent::Landed]);

        // Resting: friction keeps working, no repeated touchdown event
        let (rest, events) = sim.step(&next, Command::tick(2.0 * FRAME_MS));
        assert!(rest.vel.x < next.vel.x);
        assert!(events.is_empty());
    }

    #[test]
    fn test_landing_window_edges() {
        let sim = sim();
        let tuning = sim.tuning().clone();
        for x in [tuning.landing_min_x(), tuning.landing_max_x()] {
            let state = SimulationState {
                pos: DVec2::new(x, 0.0),
                vel: DVec2::new(0.0, -0.01),
                ..flying(&sim)
            };
            let next = sim.apply(&state, Command::tick(FRAME_MS));
            assert_eq!(next.pos.y, 0.0, "x={x} should land");
            assert!(!next.paused);
        }
    }

    #[test]
    fn test_hard_landing_crashes() {
        let sim = sim();
        let state = SimulationState {
            pos: DVec2::new(40.0, -0.5),
            vel: DVec2::new(0.0, -0.05),
            score: 50,
            wind_velocity_x: 0.03,
            ..flying(&sim)
        };
        let (next, events) = sim.step(&state, Command::tick(100.0));
        assert_eq!(next, SimulationState::initial_at(sim.tuning(), 100.0));
        assert_eq!(events, vec![GameEvent::Crashed { score: 50 }]);
    }

    #[test]
    fn test_off_platform_crashes() {
        let sim = sim();
        let state = SimulationState {
            pos: DVec2::new(80.0, -0.1),
            vel: DVec2::new(0.0, -0.001),
            score: 20,
            ..flying(&sim)
        };
        let next = sim.apply(&state, Command::tick(FRAME_MS));
        assert_eq!(next.score, 0);
        assert_eq!(next.wind_velocity_x, sim.tuning().wind_initial);
        assert!(next.paused);
    }

    #[test]
    fn test_engine_on_below_ground_crashes() {
        let sim = sim();
        let state = SimulationState {
            engine_on: true,
            pos: DVec2::new(40.0, -0.1),
            vel: DVec2::new(0.0, -0.001),
            ..flying(&sim)
        };
        let next = sim.apply(&state, Command::tick(FRAME_MS));
        assert!(next.paused);
        assert_eq!(next.pos, sim.tuning().start_position);
    }

    #[test]
    fn test_ceiling_crashes() {
        let sim = sim();
        let state = SimulationState {
            engine_on: true,
            pos: DVec2::new(40.0, sim.tuning().max_altitude + 0.1),
            ..flying(&sim)
        };
        let (next, events) = sim.step(&state, Command::tick(FRAME_MS));
        assert!(matches!(events[..], [GameEvent::Crashed { .. }]));
        assert_eq!(next.pos, sim.tuning().start_position);
    }

    #[test]
    fn test_coin_pickup() {
        let sim = sim();
        let state = SimulationState {
            pos: DVec2::new(20.0, 30.0),
            coin: DVec2::new(22.0, 32.0),
            score: 10,
            ..flying(&sim)
        };
        let (next, events) = sim.step(&state, Command::tick(FRAME_MS));
        assert!(!next.coin_visible);
        assert_eq!(next.score, 10 + sim.tuning().coin_score);
        assert_eq!(
            events,
            vec![GameEvent::CoinCollected {
                score: 10 + sim.tuning().coin_score
            }]
        );

        // Hidden coin cannot be collected twice
        let again = sim.apply(&next, Command::tick(2.0 * FRAME_MS));
        assert_eq!(again.score, next.score);
    }

    #[test]
    fn test_pickup_uses_frame_start_geometry() {
        let sim = sim();
        // Touching at the start of the frame, moving clear during it
        let state = SimulationState {
            pos: DVec2::new(20.0, 30.0),
            vel: DVec2::new(1.0, 0.0),
            coin: DVec2::new(29.0, 30.0),
            ..flying(&sim)
        };
        let next = sim.apply(&state, Command::tick(FRAME_MS));
        assert!(!next.coin_visible);

        // Clear at the start of the frame, overlapping after it
        let state = SimulationState {
            pos: DVec2::new(10.0, 30.0),
            vel: DVec2::new(0.5, 0.0),
            coin: DVec2::new(22.0, 30.0),
            ..flying(&sim)
        };
        let next = sim.apply(&state, Command::tick(FRAME_MS));
        assert!(next.coin_visible);
        assert_eq!(next.score, 0);
    }

    #[test]
    fn test_coin_respawn_after_settling() {
        let sim = sim();
        let tuning = sim.tuning().clone();
        let state = SimulationState {
            pos: DVec2::new(40.0, 0.0),
            vel: DVec2::new(0.0005, 0.0),
            coin_visible: false,
            score: 10,
            ..flying(&sim)
        };
        let (next, events) = sim.step(&state, Command::tick(FRAME_MS));
        assert!(next.coin_visible);
        assert_eq!(next.coin, next_coin_position(state.coin, &tuning));
        assert_eq!(next.vel.x, 0.0);
        assert_eq!(next.score, 10);
        let wind = state.wind_velocity_x + tuning.wind_increment;
        assert_eq!(next.wind_velocity_x, wind);
        assert_eq!(events, vec![GameEvent::CoinRespawned { wind }]);
    }

    #[test]
    fn test_no_respawn_while_sliding() {
        let sim = sim();
        let state = SimulationState {
            pos: DVec2::new(40.0, 0.0),
            vel: DVec2::new(0.01, 0.0),
            coin_visible: false,
            ..flying(&sim)
        };
        let next = sim.apply(&state, Command::tick(FRAME_MS));
        assert!(!next.coin_visible);
        assert_eq!(next.pos.y, 0.0);
        assert!(next.vel.x < state.vel.x);
    }

    #[test]
    fn test_restart_keeps_clock() {
        let sim = sim();
        let state = SimulationState {
            pos: DVec2::new(70.0, 12.0),
            score: 90,
            last_timestamp: 4321.0,
            engine_on: true,
            ..flying(&sim)
        };
        let next = sim.apply(&state, Command::Restart);
        assert_eq!(next, SimulationState::initial_at(sim.tuning(), 4321.0));
    }

    #[test]
    fn test_backwards_timestamp_does_not_integrate() {
        let sim = sim();
        let state = SimulationState {
            last_timestamp: 1000.0,
            vel: DVec2::new(0.01, 0.01),
            ..flying(&sim)
        };
        let next = sim.apply(&state, Command::tick(900.0));
        assert_eq!(next.pos, state.pos);
        assert_eq!(next.vel.y, state.vel.y);
    }

    #[test]
    fn test_dispatch_json() {
        let sim = sim();
        let state = sim
            .dispatch_json(&sim.initial(), r#"{"type":"start_engine"}"#)
            .unwrap();
        assert!(state.engine_on);

        let err = sim
            .dispatch_json(&state, r#"{"type":"warp_drive"}"#)
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidCommand(_)));
    }

    #[test]
    fn test_determinism() {
        let sim = sim();
        let commands = [
            Command::StartEngine,
            Command::tick(16.0),
            Command::tick(33.0),
            Command::StopEngine,
            Command::tick(49.0),
            Command::tick(70.0),
        ];
        let run = || {
            commands
                .iter()
                .fold(sim.initial(), |state, &command| sim.apply(&state, command))
        };
        assert_eq!(run(), run());
    }
}
