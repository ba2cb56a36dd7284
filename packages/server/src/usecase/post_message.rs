//! UseCase: メッセージ投稿処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PostMessageUseCase::execute() メソッド
//! - PostMessageUseCase::broadcast_posted() メソッド
//!
//! ### なぜこのテストが必要か
//! - 検証・不適切語チェックを通過した投稿だけが保存されることを保証
//! - 拒否された投稿が保存もブロードキャストもされないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：投稿の保存とライブ購読者への通知
//! - 異常系：空・長すぎる・不適切語を含む投稿、ストレージ障害

use std::sync::Arc;

use kokuban_shared::{profanity::ProfanityGate, time::Clock};

use crate::domain::{
    Message, MessageContent, MessageIdFactory, MessagePusher, MessageRepository, Timestamp,
};

use super::error::PostMessageError;

/// メッセージ投稿のユースケース
pub struct PostMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MessageRepository>,
    /// MessagePusher（ライブ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 不適切語チェック
    profanity_gate: Arc<dyn ProfanityGate>,
    clock: Arc<dyn Clock>,
    max_content_chars: usize,
}

impl PostMessageUseCase {
    /// 新しい PostMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        profanity_gate: Arc<dyn ProfanityGate>,
        clock: Arc<dyn Clock>,
        max_content_chars: usize,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            profanity_gate,
            clock,
            max_content_chars,
        }
    }

    /// 投稿を実行
    ///
    /// # Arguments
    ///
    /// * `raw_content` - 投稿されたテキスト（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 保存されたメッセージ（永続 ID とサーバー時刻付き）
    /// * `Err(PostMessageError)` - 検証失敗、不適切語、保存失敗
    pub async fn execute(&self, raw_content: &str) -> Result<Message, PostMessageError> {
        // 1. 内容の検証
        let content = MessageContent::parse(raw_content, self.max_content_chars)?;

        // 2. 不適切語チェック（初回は単語リストの読み込みを待つ）
        if self.profanity_gate.check(content.as_str()).await {
            tracing::info!(
                "Rejected profane post: '{}'",
                self.profanity_gate.clean(content.as_str())
            );
            return Err(PostMessageError::Profane);
        }

        // 3. 保存
        let message = Message::new(
            MessageIdFactory::generate(),
            content,
            Timestamp::new(self.clock.now_millis()),
        );
        self.repository
            .add_message(message.clone())
            .await
            .map_err(|e| PostMessageError::Storage(e.to_string()))?;

        tracing::info!("Stored message '{}'", message.id.as_str());
        Ok(message)
    }

    /// 保存済みの投稿をライブ購読者にブロードキャスト
    ///
    /// # Returns
    ///
    /// 通知が届いた購読者数
    pub async fn broadcast_posted(&self, payload: &str) -> Result<usize, String> {
        self.message_pusher
            .broadcast(payload)
            .await
            .map_err(|e| e.to_string())
    }
}
