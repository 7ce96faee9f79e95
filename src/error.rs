use thiserror::Error;

use crate::color::ColorParseError;
use crate::pen::PenError;
use crate::renderer::CanvasError;
use crate::snapshot::SnapshotError;

/// Errors raised by a drawing surface
#[derive(Debug, Error)]
pub enum DrawOverError {
    /// The surface cannot be created. Fatal, nothing is retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Canvas(#[from] CanvasError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pen(#[from] PenError),

    #[error(transparent)]
    Color(#[from] ColorParseError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Result type for surface operations
pub type DrawOverResult<T> = Result<T, DrawOverError>;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
