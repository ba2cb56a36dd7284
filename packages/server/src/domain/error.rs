//! Domain error types.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("Message ID must not be empty")]
    EmptyMessageId,

    #[error("Subscriber ID must not be empty")]
    EmptySubscriberId,

    #[error("Message content must not be empty")]
    EmptyContent,

    #[error("Message content is too long ({actual} > {max} characters)")]
    ContentTooLong { max: usize, actual: usize },
}

/// Repository errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Message '{0}' already exists")]
    DuplicateMessage(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Live update delivery errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
