//! Error types for the pool store

use chrono::{DateTime, Utc};
use pool_engine::PoolError;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading or writing pool data
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record or result rejected by the engine's boundary checks
    #[error(transparent)]
    Engine(#[from] PoolError),

    /// Results provider document is readable JSON but not a usable race table
    #[error("Malformed provider document: {0}")]
    Provider(String),

    /// Prediction arrived after the event started
    #[error("Predictions for {event_id} closed at {locked_at}")]
    SubmissionLocked { event_id: String, locked_at: DateTime<Utc> },

    /// Event is not on the season schedule
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Create a new provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
