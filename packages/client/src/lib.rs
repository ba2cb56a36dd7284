//! Kokuban sticker board viewer.
//!
//! The heart of this crate is [`board::Board`]: the pool of known messages,
//! a shuffled deck over it, a priority lane for freshly arrived posts and a
//! bounded window of visible stickers. [`session`] drives one board from a
//! single task, merging live updates and reconciling optimistic posts with
//! the message store.

// layers
pub mod board;
pub mod domain;
pub mod infrastructure;
pub mod session;
pub mod ui;
