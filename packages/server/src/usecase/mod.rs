//! UseCase 層
//!
//! - `get_recent_messages`: 最新メッセージのウィンドウ取得
//! - `post_message`: 投稿（検証・不適切語チェック・保存・ライブ通知）
//! - `subscribe_live_feed`: ライブ購読者の接続・切断

pub mod error;
pub mod get_recent_messages;
pub mod post_message;
pub mod subscribe_live_feed;

pub use error::{FetchMessagesError, PostMessageError};
pub use get_recent_messages::{DEFAULT_FETCH_LIMIT, GetRecentMessagesUseCase};
pub use post_message::PostMessageUseCase;
pub use subscribe_live_feed::SubscribeLiveFeedUseCase;
