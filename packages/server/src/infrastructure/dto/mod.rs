//! Data Transfer Objects (DTOs) for the message store.
//!
//! The wire types themselves live in `kokuban_shared::dto` so that the viewer
//! decodes exactly what the store encodes. This module converts between them
//! and the domain entities.

pub mod conversion;

pub use conversion::encode_messages_pushed;
pub use kokuban_shared::dto::{
    ErrorResponse, MessageDto, MessagesPushed, PostMessageRequest, PushType,
};
