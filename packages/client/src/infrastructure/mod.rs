//! Infrastructure 層
//!
//! - `http`: reqwest によるメッセージストアへのアクセス
//! - `websocket`: tokio-tungstenite によるライブフィード（再接続あり）
//! - `inmemory`: プロセス内ストア（オフライン表示・テスト用）

pub mod conversion;
pub mod http;
pub mod inmemory;
pub mod reconnect;
pub mod websocket;

pub use http::HttpGateway;
pub use inmemory::InMemoryGateway;
pub use reconnect::ReconnectPolicy;
pub use websocket::{WebSocketLiveFeed, live_feed_url};
