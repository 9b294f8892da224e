//! Error types for the scoring engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors raised when data crosses into the engine
///
/// Scoring itself never fails. These errors come from the boundary checks that keep
/// malformed results and predictions out of the scoring path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Official classification breaks the contiguous-rank or unique-name rules
    #[error("Invalid result for {event_id}: {reason}")]
    InvalidResult { event_id: String, reason: String },

    /// Prediction record has the wrong shape
    #[error("Invalid prediction from {participant_id} for {event_id}: {reason}")]
    InvalidPrediction { participant_id: String, event_id: String, reason: String },

    /// Scoring configuration is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PoolError {
    /// Create a new invalid result error
    pub fn invalid_result(event_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResult { event_id: event_id.into(), reason: reason.into() }
    }

    /// Create a new invalid prediction error
    pub fn invalid_prediction(
        participant_id: impl Into<String>,
        event_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidPrediction {
            participant_id: participant_id.into(),
            event_id: event_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
