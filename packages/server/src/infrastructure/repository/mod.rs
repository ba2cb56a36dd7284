//! Repository 実装
//!
//! - `inmemory`: Vec をストレージとして使う実装

pub mod inmemory;

pub use inmemory::InMemoryMessageRepository;
