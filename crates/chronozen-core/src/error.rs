//! Core error types for chronozen-core.
//!
//! Nothing in ChronoZen is fatal at runtime: storage, the message generator
//! and notifications are all optional collaborators. These types exist so the
//! boundaries can report *what* failed before the caller logs it and carries
//! on with defaults.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for chronozen-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Message generator errors
    #[error("Message generator error: {0}")]
    Generator(#[from] GeneratorError),

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

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The store cannot be used at all (no data directory, poisoned lock, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
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
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// No usable data directory
    #[error("Cannot determine data directory: {0}")]
    NoDataDir(String),
}

/// Message generator errors.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Generator switched off in config
    #[error("Message generator is disabled")]
    Disabled,

    /// Endpoint is not a URL
    #[error("Invalid generator endpoint: {0}")]
    InvalidEndpoint(String),

    /// No API key available
    #[error("No API key found (env var '{env}' unset and no keyring entry)")]
    MissingApiKey { env: String },

    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status
    #[error("Generator returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response did not carry a message
    #[error("Generator response had no message")]
    EmptyResponse,
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Task text is blank after trimming
    #[error("Task text must not be empty")]
    EmptyTaskText,

    /// Display name is blank after trimming
    #[error("Name must not be empty")]
    EmptyName,

    /// No task with this id
    #[error("Unknown task: {0}")]
    UnknownTask(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

