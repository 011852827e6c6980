//! Error types for the damper scheduler.

use thiserror::Error;

/// Main error type for damper operations.
#[derive(Error, Debug)]
pub enum DamperError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Factory constructed outside a tokio reactor
    #[error("Timer runtime unavailable: {0}")]
    Runtime(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for damper operations.
pub type Result<T> = std::result::Result<T, DamperError>;
