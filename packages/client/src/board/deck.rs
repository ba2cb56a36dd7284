//! Shuffled draw order over the pool.

use rand::{Rng, seq::SliceRandom};

use super::pool::Pool;
use crate::domain::Message;

/// One shuffled cycle over the pool, consumed from the back
#[derive(Debug, Default, Clone)]
pub struct Deck {
    cards: Vec<Message>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the deck with a fresh permutation of the whole pool
    pub fn regenerate<R: Rng + ?Sized>(&mut self, pool: &Pool, rng: &mut R) {
        self.cards = pool.iter().cloned().collect();
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Option<Message> {
        self.cards.pop()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
