//! Conversion logic between wire DTOs and domain entities.

use kokuban_shared::dto::{MessageDto, MessagesPushed};
use tracing::warn;

use crate::domain::{Message, MessageId, Timestamp, ValueObjectError};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<MessageDto> for Message {
    type Error = ValueObjectError;

    fn try_from(dto: MessageDto) -> Result<Self, Self::Error> {
        Ok(Message::new(
            MessageId::new(dto.id)?,
            dto.content,
            Timestamp::new(dto.created_at),
        ))
    }
}

/// Convert a batch, dropping entries that cannot be domain messages
pub fn messages_from_dtos(dtos: Vec<MessageDto>) -> Vec<Message> {
    dtos.into_iter()
        .filter_map(|dto| match Message::try_from(dto) {
            Ok(message) => Some(message),
            Err(e) => {
                warn!("Skipping malformed message from store: {}", e);
                None
            }
        })
        .collect()
}

/// Decode one live feed frame
pub fn decode_messages_pushed(text: &str) -> Result<Vec<Message>, serde_json::Error> {
    let pushed: MessagesPushed = serde_json::from_str(text)?;
    Ok(messages_from_dtos(pushed.messages))
}
