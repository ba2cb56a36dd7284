//! InMemory Message Repository 実装
//!
//! ドメイン層が定義する MessageRepository trait の具体的な実装。
//! 投稿順の Vec をインメモリ DB として使用します。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Message, MessageRepository, RepositoryError};

/// インメモリ Message Repository 実装
pub struct InMemoryMessageRepository {
    /// 投稿順（古い順）のメッセージ
    messages: Arc<Mutex<Vec<Message>>>,
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(Vec::new())))
    }
}

impl InMemoryMessageRepository {
    /// 新しい InMemoryMessageRepository を作成
    pub fn new(messages: Arc<Mutex<Vec<Message>>>) -> Self {
        Self { messages }
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn add_message(&self, message: Message) -> Result<(), RepositoryError> {
        let mut messages = self.messages.lock().await;
        if messages.iter().any(|m| m.id == message.id) {
            return Err(RepositoryError::DuplicateMessage(
                message.id.as_str().to_string(),
            ));
        }
        messages.push(message);
        Ok(())
    }

    async fn recent_messages(&self, limit: usize) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.lock().await;
        let mut recent: Vec<Message> = messages.iter().rev().take(limit).cloned().collect();
        // 同時刻の投稿は投稿順の逆順を保つ（安定ソート）
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recent)
    }

    async fn count_messages(&self) -> usize {
        self.messages.lock().await.len()
    }
}
