//! UseCase: ライブ購読者の接続・切断

use std::sync::Arc;

use crate::domain::{MessagePusher, PusherChannel, SubscriberId, SubscriberIdFactory};

/// ライブ購読のユースケース
pub struct SubscribeLiveFeedUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SubscribeLiveFeedUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 購読者を登録し、割り当てた ID を返す
    pub async fn connect(&self, sender: PusherChannel) -> SubscriberId {
        let subscriber_id = SubscriberIdFactory::generate();
        self.message_pusher
            .register_subscriber(subscriber_id.clone(), sender)
            .await;
        subscriber_id
    }

    /// 購読者の登録を解除
    pub async fn disconnect(&self, subscriber_id: &SubscriberId) {
        self.message_pusher
            .unregister_subscriber(subscriber_id)
            .await;
    }

    /// 接続中の購読者数
    pub async fn count(&self) -> usize {
        self.message_pusher.count_subscribers().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_then_disconnect() {
        // テスト項目: 接続で購読者が増え、切断で元に戻る
        // given (前提条件):
        let usecase = SubscribeLiveFeedUseCase::new(Arc::new(WebSocketMessagePusher::default()));
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let subscriber_id = usecase.connect(tx).await;
        let connected = usecase.count().await;
        usecase.disconnect(&subscriber_id).await;

        // then (期待する結果):
        assert_eq!(connected, 1);
        assert_eq!(usecase.count().await, 0);
    }

    #[tokio::test]
    async fn test_each_connection_gets_distinct_id() {
        // テスト項目: 接続ごとに異なる購読者 ID が割り当てられる
        // given (前提条件):
        let usecase = SubscribeLiveFeedUseCase::new(Arc::new(WebSocketMessagePusher::default()));
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when (操作):
        let a = usecase.connect(tx1).await;
        let b = usecase.connect(tx2).await;

        // then (期待する結果):
        assert_ne!(a, b);
        assert_eq!(usecase.count().await, 2);
    }
}
