//! MessagePusher trait 定義
//!
//! ライブ購読者へ新着メッセージを届けるためのインターフェース。
//! WebSocket などの具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, SubscriberId};

/// 購読者へのメッセージ送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 購読者を登録
    async fn register_subscriber(&self, subscriber_id: SubscriberId, sender: PusherChannel);

    /// 購読者の登録を解除
    async fn unregister_subscriber(&self, subscriber_id: &SubscriberId);

    /// 全ての購読者に送信し、届いた購読者数を返す
    ///
    /// 一部の購読者への送信失敗は許容される。
    async fn broadcast(&self, content: &str) -> Result<usize, MessagePushError>;

    /// 登録中の購読者数
    async fn count_subscribers(&self) -> usize;
}
