//! Error types for Deoptscope

use crate::position::Position;
use thiserror::Error;

/// Deoptscope error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: Position, end: Position },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for Deoptscope
pub type Result<T> = std::result::Result<T, Error>;
