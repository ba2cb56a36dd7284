//! Bounded window of visible stickers.

use std::collections::VecDeque;

use crate::domain::{DisplayedSticker, Message, MessageId, RenderKey};

/// Visible stickers in display order, oldest first
///
/// Holds at most `capacity` stickers. Pushing beyond that retires the oldest ones.
#[derive(Debug, Clone)]
pub struct DisplayWindow {
    capacity: usize,
    stickers: VecDeque<DisplayedSticker>,
    next_nonce: u64,
}

impl DisplayWindow {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            stickers: VecDeque::with_capacity(capacity + 1),
            next_nonce: 0,
        }
    }

    /// Render key for the next display instance of `id`
    pub fn next_key(&mut self, id: &MessageId) -> RenderKey {
        self.next_nonce += 1;
        RenderKey::new(id, self.next_nonce)
    }

    /// Append a sticker and return the ones evicted to make room, oldest first
    pub fn push(&mut self, sticker: DisplayedSticker) -> Vec<DisplayedSticker> {
        self.stickers.push_back(sticker);
        let excess = self.stickers.len().saturating_sub(self.capacity);
        self.stickers.drain(..excess).collect()
    }

    pub fn remove(&mut self, key: &RenderKey) -> Option<DisplayedSticker> {
        let index = self.stickers.iter().position(|s| &s.key == key)?;
        self.stickers.remove(index)
    }

    /// Swap the message behind a visible sticker, keeping its key and placement
    pub fn replace_message(&mut self, key: &RenderKey, message: Message) -> bool {
        match self.stickers.iter_mut().find(|s| &s.key == key) {
            Some(sticker) => {
                sticker.message = message;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &RenderKey) -> Option<&DisplayedSticker> {
        self.stickers.iter().find(|s| &s.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayedSticker> {
        self.stickers.iter()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }
}
