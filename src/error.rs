//! Error types for the command wire form and tuning configuration
//!
//! In-game failures (crashing the vehicle) are not errors: they are ordinary
//! state transitions handled inside the tick.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Command tag not in the known set, or a malformed command payload
    InvalidCommand(String),
    /// A tuning value is outside the range the simulation can handle
    InvalidTuning { field: &'static str, reason: String },
    /// Tuning JSON could not be parsed
    Config(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCommand(cmd) => write!(f, "invalid command: {cmd}"),
            Self::InvalidTuning { field, reason } => {
                write!(f, "invalid tuning value for `{field}`: {reason}")
            }
            Self::Config(msg) => write!(f, "failed to parse tuning: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}

pub type SimResult<T> = Result<T, SimError>;
