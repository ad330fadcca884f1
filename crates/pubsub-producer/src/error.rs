//! Error types for building and publishing messages.

use thiserror::Error;

/// Errors that can occur while preparing or publishing messages.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to parse {origin}: {reason}")]
    Parse { origin: String, reason: String },

    #[error("Topic not found: {0}")]
    TopicNotFound(String),

    #[error("Permission denied for topic: {0}")]
    PermissionDenied(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PublishError {
    pub(crate) fn parse(origin: impl Into<String>, reason: impl ToString) -> Self {
        PublishError::Parse {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}
