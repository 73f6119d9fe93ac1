//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestamps come from the driver, never from a clock
//! - Every transition returns a new state, nothing is mutated in place
//! - No rendering or platform dependencies

pub mod collision;
pub mod command;
pub mod state;
pub mod tick;

pub use collision::{Aabb, next_coin_position, vehicle_coin_overlap, wrap};
pub use command::Command;
pub use state::{GameEvent, SimulationState};
pub use tick::{Simulation, tick};
