//! Error types for RoboFactory operations.
//!
//! Every failure in the core is recoverable: dispatch turns these into a
//! `false` result plus a diagnostic, never a panic.

use crate::types::Cell;
use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Malformed action requests: unknown names, wrong arity, wrong argument types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("{action} expects {expected} argument(s), got {actual}")]
    Arity {
        action: String,
        expected: usize,
        actual: usize,
    },

    #[error("{action}: argument {index} must be {expected}, got {found}")]
    ArgumentType {
        action: String,
        index: usize,
        expected: &'static str,
        found: String,
    },
}

/// Errors raised while executing an action against the model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("agent {0} is not a delivery robot")]
    NotARobot(String),

    #[error("agent {0} cannot move")]
    Immobile(String),

    #[error("battery level {0} out of range (must be 0-100)")]
    BatteryOutOfRange(i64),

    #[error("cell {0} is outside the grid or blocked")]
    InvalidLocation(Cell),

    #[error("no charging station registered for {0}")]
    UnknownStation(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SimError {
    /// Short category name used in diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            SimError::Action(_) => "validation",
            SimError::UnknownAgent(_) | SimError::UnknownStation(_) => "unknown_entity",
            SimError::NotARobot(_) | SimError::Immobile(_) | SimError::InvalidLocation(_) => "validation",
            SimError::BatteryOutOfRange(_) => "range",
            SimError::Config(_) => "config",
        }
    }
}

/// Errors from the literal parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error at byte {offset}: {message}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}
