//! Commands fed into the simulation
//!
//! Drivers normally build `Command` values directly. Browser glue and replay
//! files use the JSON form (`{"type": "tick", "timestamp": 16.0}`) or bare
//! action names, which is the only place an unknown command can show up.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// One input to the state transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Advance simulated time to `timestamp` (ms)
    Tick { timestamp: f64 },
    /// Unpause and apply lift
    StartEngine,
    /// Cut lift (pause state untouched)
    StopEngine,
    /// Back to the initial state
    Restart,
}

impl Command {
    pub fn tick(timestamp: f64) -> Self {
        Command::Tick { timestamp }
    }

    /// Parse the tagged JSON form
    pub fn from_json(json: &str) -> SimResult<Self> {
        serde_json::from_str(json).map_err(|e| SimError::InvalidCommand(e.to_string()))
    }

    /// Wire name of this command
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Tick { .. } => "tick",
            Command::StartEngine => "start_engine",
            Command::StopEngine => "stop_engine",
            Command::Restart => "restart",
        }
    }
}

/// Bare action names; `tick` needs a timestamp and is only accepted as JSON
impl FromStr for Command {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start_engine" | "start" => Ok(Command::StartEngine),
            "stop_engine" | "stop" => Ok(Command::StopEngine),
            "restart" => Ok(Command::Restart),
            other => Err(SimError::InvalidCommand(other.to_string())),
        }
    }
}
