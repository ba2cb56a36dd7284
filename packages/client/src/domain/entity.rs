//! Entities.

use std::fmt;

use super::value_object::{MessageContent, MessageId, Timestamp};

/// A posted note. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub created_at: Timestamp,
}

impl Message {
    pub fn new(id: MessageId, content: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id,
            content: content.into(),
            created_at,
        }
    }

    /// Local stand-in for a post the store has not confirmed yet
    pub fn provisional(content: &MessageContent, now: Timestamp) -> Self {
        Self::new(MessageId::provisional(), content.as_str(), now)
    }
}

/// Identity of one display instance
///
/// The same message can be shown again later, so the key combines the
/// message ID with a per-session display nonce.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderKey(String);

impl RenderKey {
    pub fn new(id: &MessageId, nonce: u64) -> Self {
        Self(format!("{}-{}", id, nonce))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a sticker lands on the canvas
///
/// `x` and `y` are percentages of the canvas, `rotation` is in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

/// A message currently visible on the board
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedSticker {
    pub key: RenderKey,
    pub message: Message,
    pub placement: Placement,
    /// Paper skin variant, 1-based
    pub skin: u8,
}
