//! Domain error types.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("Message ID must not be empty")]
    EmptyMessageId,

    #[error("Message ID '{0}' uses the reserved provisional prefix")]
    ReservedPrefix(String),
}

/// Content rejected before anything is sent to the store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("Message must not be empty")]
    Empty,

    #[error("Message must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Failures reported by the message store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Refused by store policy (e.g. profanity)
    #[error("{0}")]
    Rejected(String),

    /// Connectivity or protocol failure
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Outcome of a failed post, as seen by the input surface
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostError {
    #[error("{0}")]
    Invalid(#[from] ContentError),

    #[error("{0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Board session is closed")]
    SessionClosed,
}

impl From<GatewayError> for PostError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Rejected(reason) => PostError::Rejected(reason),
            GatewayError::Transport(reason) => PostError::Transport(reason),
        }
    }
}
