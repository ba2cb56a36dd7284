//! HTTP / WebSocket interface of the message store.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
