//! Link error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Malformed message {message:?}: {reason}")]
    Malformed { message: String, reason: String },

    #[error("Unknown command {message:?}")]
    UnknownCommand { message: String },

    #[error("Invalid address {addr:?}: {source}")]
    Address {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LinkResult<T> = Result<T, LinkError>;
