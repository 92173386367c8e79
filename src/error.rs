//! Error types for the hand gesture control library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Landmark input did not describe a single 21-point hand
    #[error("Invalid pose: {0}")]
    InvalidPose(String),

    /// Referenced gesture label or sample index does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rename target already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Durable write of the gesture store or bindings failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A sample was requested but no hand is currently visible
    #[error("No hand detected")]
    NoHandDetected,

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An action executor reported a failure
    #[error("Action failed: {0}")]
    ActionFailed(String),

    /// Shared state mutex was poisoned by a panicking holder
    #[error("Shared state lock poisoned")]
    LockPoisoned,

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Application-specific error type (alias for main Error type)
pub type AppError = Error;

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
