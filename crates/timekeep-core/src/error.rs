//! Core error types for timekeep-core.
//!
//! Every failure in the library is recoverable: callers report it and carry
//! on. The hierarchy uses thiserror with per-area enums folded into a single
//! [`CoreError`] umbrella.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Core error type for timekeep-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// History persistence errors
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors (bad countdown input)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// History-store-specific errors.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The history file exists but cannot be read
    #[error("Failed to read history from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The history file exists but does not parse
    #[error("Failed to parse history at {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// The history file cannot be written
    #[error("Failed to write history to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record list cannot be serialized
    #[error("Failed to encode history: {0}")]
    EncodeFailed(#[from] serde_json::Error),

    /// Delete/rename aimed at a record no longer present
    #[error("No record with id {id}")]
    NotFound { id: Uuid },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO errors while resolving or creating the data directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Countdown input validation errors. No state changes on failure.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A time component is outside the accepted range
    #[error("Invalid {field}: {value} is outside 0..=60")]
    ComponentOutOfRange { field: &'static str, value: i64 },

    /// The configured target works out to zero
    #[error("Countdown target must be greater than zero")]
    ZeroTarget,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
