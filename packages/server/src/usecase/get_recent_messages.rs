//! UseCase: 最新メッセージ取得

use std::sync::Arc;

use crate::domain::{Message, MessageRepository};

use super::error::FetchMessagesError;

/// Default size of the recent window served to viewers
pub const DEFAULT_FETCH_LIMIT: usize = 50;

/// 最新メッセージ取得のユースケース
pub struct GetRecentMessagesUseCase {
    repository: Arc<dyn MessageRepository>,
    fetch_limit: usize,
}

impl GetRecentMessagesUseCase {
    pub fn new(repository: Arc<dyn MessageRepository>, fetch_limit: usize) -> Self {
        Self {
            repository,
            fetch_limit,
        }
    }

    /// 新しい順に最大 `fetch_limit` 件を返す。0 件は正常系。
    pub async fn execute(&self) -> Result<Vec<Message>, FetchMessagesError> {
        self.repository
            .recent_messages(self.fetch_limit)
            .await
            .map_err(|e| FetchMessagesError::Storage(e.to_string()))
    }

    /// 保存済みメッセージの総数
    pub async fn count(&self) -> usize {
        self.repository.count_messages().await
    }
}
