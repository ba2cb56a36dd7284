//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{get_messages, health_check, post_message};
pub use websocket::live_feed_handler;
