//! Shared building blocks for the Kokuban blackboard.
//!
//! - `time`: clock abstraction and timestamp formatting
//! - `logger`: tracing subscriber setup for the binaries
//! - `dto`: wire format exchanged between the message store and its viewers
//! - `profanity`: the word-list based profanity gate

pub mod dto;
pub mod logger;
pub mod profanity;
pub mod time;
