//! Pool of known messages.

use indexmap::IndexMap;
use tracing::debug;

use crate::domain::{Message, MessageId, Timestamp};

/// Every message known to the session, deduplicated by ID
///
/// The pool only grows. Provisional messages never enter it; an optimistic
/// post joins the pool once the store confirms it under its durable ID.
/// Insertion order is kept so seeded shuffles are reproducible.
#[derive(Debug, Default, Clone)]
pub struct Pool {
    messages: IndexMap<MessageId, Message>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a message unless its ID is already known. Returns whether it was added.
    pub fn insert(&mut self, message: Message) -> bool {
        if message.id.is_provisional() {
            debug!("Ignoring provisional message {} for the pool", message.id);
            return false;
        }
        if self.messages.contains_key(&message.id) {
            return false;
        }
        self.messages.insert(message.id.clone(), message);
        true
    }

    /// Union a fetch result into the pool. Returns the number of new entries.
    pub fn seed(&mut self, messages: impl IntoIterator<Item = Message>) -> usize {
        messages
            .into_iter()
            .map(|message| self.insert(message))
            .filter(|added| *added)
            .count()
    }

    /// Merge a live delta and return the entries that count as new for this session
    ///
    /// Every unseen message is added. Only those created after `session_started_at`
    /// are returned, in delta order.
    pub fn merge(
        &mut self,
        delta: impl IntoIterator<Item = Message>,
        session_started_at: Timestamp,
    ) -> Vec<Message> {
        let mut fresh = Vec::new();
        for message in delta {
            let is_recent = message.created_at > session_started_at;
            if self.insert(message.clone()) && is_recent {
                fresh.push(message);
            }
        }
        fresh
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.messages.contains_key(id)
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.values()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
