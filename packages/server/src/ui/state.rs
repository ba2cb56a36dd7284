//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{GetRecentMessagesUseCase, PostMessageUseCase, SubscribeLiveFeedUseCase};

/// Shared application state
pub struct AppState {
    pub get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
    pub post_message_usecase: Arc<PostMessageUseCase>,
    pub subscribe_live_feed_usecase: Arc<SubscribeLiveFeedUseCase>,
}
