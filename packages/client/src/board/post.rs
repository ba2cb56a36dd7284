//! Optimistic posts.

use crate::domain::{DisplayedSticker, Message, MessageContent, MessageId, RenderKey};

/// Terminal state of a submitted post
///
/// Until the store answers, the post is represented by a [`PendingPost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostState {
    /// Backed by a durable ID
    Confirmed(MessageId),
    /// Withdrawn from the board
    Rejected(String),
}

/// A post that has been shown but not yet settled by the store
#[derive(Debug, Clone)]
pub struct PendingPost {
    provisional: Message,
    key: RenderKey,
    content: MessageContent,
}

impl PendingPost {
    pub(super) fn new(provisional: Message, key: RenderKey, content: MessageContent) -> Self {
        Self {
            provisional,
            key,
            content,
        }
    }

    pub fn provisional(&self) -> &Message {
        &self.provisional
    }

    /// Render key of the optimistic sticker
    pub fn key(&self) -> &RenderKey {
        &self.key
    }

    /// Validated content to hand to the store
    pub fn content(&self) -> &MessageContent {
        &self.content
    }
}

/// What confirming a post changed on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub state: PostState,
    /// The optimistic sticker was still visible and now carries the durable record
    pub reconciled: bool,
    /// The confirmed record was queued ahead of the deck
    pub prioritized: bool,
}

/// What rejecting a post changed on the board
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub state: PostState,
    /// The optimistic sticker, if it was still visible
    pub withdrawn: Option<DisplayedSticker>,
}
