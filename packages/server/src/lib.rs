//! Kokuban message store.
//!
//! Stores short anonymous posts, serves the most recent window of them and
//! pushes every accepted post to live WebSocket subscribers.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
