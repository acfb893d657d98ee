//! Error types for murmuration_core.
//!
//! The numeric core never fails; these cover the host-facing edges:
//! configuration, buffer exchange and population management.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// A flat kinematics buffer does not hold two values per agent.
    #[error("Buffer length mismatch: expected {expected}, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    #[error("Agent index {index} out of range (population {len})")]
    AgentOutOfRange { index: usize, len: usize },

    /// A host-supplied coordinate or extent that is not a finite number.
    #[error("Invalid {name}: {value}")]
    NonFinite { name: &'static str, value: f64 },

    /// Every `FlockId` is already taken, so a new flock cannot be started.
    #[error("No fresh flock id left")]
    FlockIdsExhausted,

    /// Configuration rejected by `AppConfig::validate`.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
