//! Priority lane for fresh messages.

use std::collections::VecDeque;

use crate::domain::Message;

/// FIFO of messages that must be shown ahead of the deck
#[derive(Debug, Default, Clone)]
pub struct PriorityQueue {
    queue: VecDeque<Message>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue unless a message with the same ID is already waiting
    pub fn admit(&mut self, message: Message) -> bool {
        if self.queue.iter().any(|queued| queued.id == message.id) {
            return false;
        }
        self.queue.push_back(message);
        true
    }

    pub fn pop_front(&mut self) -> Option<Message> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
