//! Error types for the hf-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives CLI and GUI one error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to write config file: {path}")]
    ConfigFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Controller error: {0}")]
    Control(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Link error: {0}")]
    Link(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Loop worker error: {message}")]
    Worker { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for hf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<hf_config::ConfigError> for AppError {
    fn from(err: hf_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<hf_config::ValidationError> for AppError {
    fn from(err: hf_config::ValidationError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<hf_controls::ControlError> for AppError {
    fn from(err: hf_controls::ControlError) -> Self {
        AppError::Control(err.to_string())
    }
}

impl From<hf_sim::SimError> for AppError {
    fn from(err: hf_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<hf_link::LinkError> for AppError {
    fn from(err: hf_link::LinkError) -> Self {
        AppError::Link(err.to_string())
    }
}
