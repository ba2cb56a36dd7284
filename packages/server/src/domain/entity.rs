//! Entities.

use serde::Serialize;

use super::value_object::{MessageContent, MessageId, Timestamp};

/// A stored post. Immutable once created: posts are never edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

impl Message {
    pub fn new(id: MessageId, content: MessageContent, created_at: Timestamp) -> Self {
        Self {
            id,
            content,
            created_at,
        }
    }
}
