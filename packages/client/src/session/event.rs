//! Events emitted to the renderer.

use crate::domain::{DisplayedSticker, Message, RenderKey};

#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// Initial fetch merged into the pool
    PoolSeeded { fetched: usize, pool_size: usize },
    StickerShown(DisplayedSticker),
    /// Evicted to stay within capacity
    StickerRetired(DisplayedSticker),
    /// Optimistic sticker rolled back after a failed post
    StickerWithdrawn(DisplayedSticker),
    PostConfirmed { key: RenderKey, message: Message },
    /// User-visible failure notice
    PostFailed { key: RenderKey, reason: String },
}
