//! Value objects.

use std::fmt;

use uuid::Uuid;

use super::error::{ContentError, ValueObjectError};

/// Prefix that marks a locally generated, not yet persisted message ID
pub const PROVISIONAL_ID_PREFIX: &str = "temp-";

/// Message identifier
///
/// Store-assigned IDs can never start with [`PROVISIONAL_ID_PREFIX`], so a
/// provisional ID is always distinguishable from a persisted one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(String);

impl MessageId {
    /// ID assigned by the message store
    pub fn new(id: impl Into<String>) -> Result<Self, ValueObjectError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValueObjectError::EmptyMessageId);
        }
        if id.starts_with(PROVISIONAL_ID_PREFIX) {
            return Err(ValueObjectError::ReservedPrefix(id));
        }
        Ok(Self(id))
    }

    /// Fresh ID for an optimistic local post
    pub fn provisional() -> Self {
        Self(format!("{}{}", PROVISIONAL_ID_PREFIX, Uuid::new_v4().simple()))
    }

    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix timestamp (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Text the local user wants to post: trimmed, non-empty and within the length budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    /// Validate raw input. Length is counted in characters.
    pub fn parse(raw: &str, max_chars: usize) -> Result<Self, ContentError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ContentError::Empty);
        }

        let actual = trimmed.chars().count();
        if actual > max_chars {
            return Err(ContentError::TooLong {
                max: max_chars,
                actual,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
