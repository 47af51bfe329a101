//! Core error types for cueflow-core.
//!
//! Only the configuration and storage boundaries produce errors. Timer,
//! scoring and rivalry operations treat out-of-order calls as no-ops, and the
//! audio/haptic channels log and swallow their failures.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cueflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    /// A persisted slice could not be encoded or decoded
    #[error("Failed to encode slice '{key}': {source}")]
    Encoding {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors raised at configuration and setup boundaries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Timer duration must be a positive number of seconds
    #[error("Timer duration must be at least one second (got {0})")]
    ZeroDuration(u64),

    /// Timer duration above the supported maximum
    #[error("Timer duration must be at most {max} seconds (got {secs})")]
    DurationTooLong { secs: u64, max: u64 },

    /// Foul values outside the snooker range
    #[error("Foul value must be between 4 and 7 (got {0})")]
    FoulOutOfRange(u32),

    /// Player name missing after trimming
    #[error("Player name for {0} must not be empty")]
    EmptyPlayerName(&'static str),

    /// Game mode has not been chosen
    #[error("No game mode selected")]
    MissingGameMode,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
