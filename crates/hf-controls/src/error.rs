//! Error types for control system operations.

use thiserror::Error;

/// Result type for control system operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control system operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Mode label that maps to neither control mode.
    #[error("Unknown control mode: {token:?}")]
    UnknownMode { token: String },

    /// Numeric validation failure from the core helpers.
    #[error(transparent)]
    Numeric(#[from] hf_core::HfError),
}
