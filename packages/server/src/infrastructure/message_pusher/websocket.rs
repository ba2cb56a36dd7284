//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - ライブ購読者ごとの `UnboundedSender` を管理
//! - 新着メッセージのブロードキャスト
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、送信にのみ使用します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, PusherChannel, SubscriberId};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中の購読者の WebSocket sender
    ///
    /// Key: subscriber_id (String)
    /// Value: PusherChannel
    subscribers: Arc<Mutex<HashMap<String, PusherChannel>>>,
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(subscribers: Arc<Mutex<HashMap<String, PusherChannel>>>) -> Self {
        Self { subscribers }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_subscriber(&self, subscriber_id: SubscriberId, sender: PusherChannel) {
        let mut subscribers = self.subscribers.lock().await;
        subscribers.insert(subscriber_id.as_str().to_string(), sender);
        tracing::debug!("Subscriber '{}' registered", subscriber_id.as_str());
    }

    async fn unregister_subscriber(&self, subscriber_id: &SubscriberId) {
        let mut subscribers = self.subscribers.lock().await;
        subscribers.remove(subscriber_id.as_str());
        tracing::debug!("Subscriber '{}' unregistered", subscriber_id.as_str());
    }

    async fn broadcast(&self, content: &str) -> Result<usize, MessagePushError> {
        let subscribers = self.subscribers.lock().await;
        let mut delivered = 0;

        for (subscriber_id, sender) in subscribers.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            match sender.send(content.to_string()) {
                Ok(()) => {
                    delivered += 1;
                    tracing::debug!("Pushed live update to '{}'", subscriber_id);
                }
                Err(e) => {
                    tracing::warn!("Failed to push live update to '{}': {}", subscriber_id, e);
                }
            }
        }

        Ok(delivered)
    }

    async fn count_subscribers(&self) -> usize {
        self.subscribers.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SubscriberIdFactory;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 購読者の登録・解除
    // - broadcast: 全購読者への送信と、閉じたチャンネルの許容
    // ========================================

    #[tokio::test]
    async fn test_broadcast_reaches_every_subscriber() {
        // テスト項目: 登録済みの全購読者にメッセージが届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher
            .register_subscriber(SubscriberIdFactory::generate(), tx1)
            .await;
        pusher
            .register_subscriber(SubscriberIdFactory::generate(), tx2)
            .await;

        // when (操作):
        let delivered = pusher.broadcast("update").await;

        // then (期待する結果):
        assert_eq!(delivered, Ok(2));
        assert_eq!(rx1.recv().await, Some("update".to_string()));
        assert_eq!(rx2.recv().await, Some("update".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_closed_channel() {
        // テスト項目: 受信側が閉じた購読者がいてもブロードキャストは成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx_open, mut rx_open) = mpsc::unbounded_channel();
        let (tx_closed, rx_closed) = mpsc::unbounded_channel::<String>();
        drop(rx_closed);
        pusher
            .register_subscriber(SubscriberIdFactory::generate(), tx_open)
            .await;
        pusher
            .register_subscriber(SubscriberIdFactory::generate(), tx_closed)
            .await;

        // when (操作):
        let delivered = pusher.broadcast("update").await;

        // then (期待する結果):
        assert_eq!(delivered, Ok(1));
        assert_eq!(rx_open.recv().await, Some("update".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_subscriber() {
        // テスト項目: 登録解除した購読者には送信されない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscriber_id = SubscriberIdFactory::generate();
        pusher.register_subscriber(subscriber_id.clone(), tx).await;

        // when (操作):
        pusher.unregister_subscriber(&subscriber_id).await;
        let delivered = pusher.broadcast("update").await;

        // then (期待する結果):
        assert_eq!(delivered, Ok(0));
        assert_eq!(pusher.count_subscribers().await, 0);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers() {
        // テスト項目: 購読者がいなくてもエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();

        // when (操作):
        let result = pusher.broadcast("update").await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
    }
}
