//! Data Transfer Objects exchanged between the message store and its viewers.
//!
//! - HTTP: `GET /api/messages` → `Vec<MessageDto>`, `POST /api/messages` ← `PostMessageRequest`
//! - WebSocket: `/ws` pushes `MessagesPushed` frames

use serde::{Deserialize, Serialize};

/// Frame type tag for WebSocket pushes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PushType {
    Messages,
}

/// A persisted message as it travels over the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageDto {
    pub id: String,
    pub content: String,
    /// Unix timestamp (milliseconds)
    pub created_at: i64,
}

/// WebSocket push carrying newly stored messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagesPushed {
    pub r#type: PushType,
    pub messages: Vec<MessageDto>,
}

impl MessagesPushed {
    pub fn new(messages: Vec<MessageDto>) -> Self {
        Self {
            r#type: PushType::Messages,
            messages,
        }
    }
}

/// Body of `POST /api/messages`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostMessageRequest {
    pub content: String,
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}
