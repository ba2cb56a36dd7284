//! Conversion logic between DTOs and domain entities.

use kokuban_shared::dto::{MessageDto, MessagesPushed};

use crate::domain::Message;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Message> for MessageDto {
    fn from(model: Message) -> Self {
        Self {
            id: model.id.into_string(),
            content: model.content.into_string(),
            created_at: model.created_at.value(),
        }
    }
}

/// Encode messages as a WebSocket live update frame
pub fn encode_messages_pushed(messages: &[Message]) -> Result<String, serde_json::Error> {
    let pushed = MessagesPushed::new(messages.iter().cloned().map(MessageDto::from).collect());
    serde_json::to_string(&pushed)
}
