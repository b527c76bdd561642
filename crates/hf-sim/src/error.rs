//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or running the tank loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Controller error: {0}")]
    Control(#[from] hf_controls::ControlError),

    #[error(transparent)]
    Numeric(#[from] hf_core::HfError),
}

pub type SimResult<T> = Result<T, SimError>;
