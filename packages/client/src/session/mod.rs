//! Viewing session.
//!
//! A session owns one [`Board`](crate::board::Board) inside a single tokio
//! task. Ticks, live deltas, fetch results and post outcomes all reach the
//! board through that task, one at a time.

mod event;
mod runner;

pub use event::BoardEvent;
pub use runner::{SessionHandle, spawn_session, spawn_session_with_board};
