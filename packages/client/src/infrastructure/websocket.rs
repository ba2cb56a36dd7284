//! WebSocket live feed with reconnection.

use futures_util::StreamExt;
use tokio::{sync::mpsc, time};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as Frame};
use tracing::{error, info, warn};

use super::{conversion::decode_messages_pushed, reconnect::ReconnectPolicy};
use crate::domain::{LiveFeed, Message, Subscription};

/// Live feed URL for a server origin (`http://host:port` → `ws://host:port/ws`)
pub fn live_feed_url(server: &str) -> String {
    let base = server.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}/ws", base)
}

/// Subscribes to `/ws` pushes
///
/// Each subscription runs its own worker. A dropped connection is retried
/// according to the [`ReconnectPolicy`]; when the budget runs out the
/// subscription ends.
#[derive(Debug, Clone)]
pub struct WebSocketLiveFeed {
    url: String,
    policy: ReconnectPolicy,
}

impl WebSocketLiveFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            policy: ReconnectPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl LiveFeed for WebSocketLiveFeed {
    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_feed(self.url.clone(), self.policy, tx));
        Subscription::new(rx, worker)
    }
}

enum FeedEnd {
    /// The subscriber went away
    Unsubscribed,
    /// A healthy connection was lost
    Disconnected,
}

async fn run_feed(url: String, policy: ReconnectPolicy, deltas: mpsc::UnboundedSender<Vec<Message>>) {
    let mut reconnect_count = 0;

    loop {
        match stream_feed(&url, &deltas).await {
            Ok(FeedEnd::Unsubscribed) => return,
            Ok(FeedEnd::Disconnected) => {
                // a healthy connection earns a fresh budget
                reconnect_count = 0;
            }
            Err(e) => warn!("Live feed connection to {} failed: {}", url, e),
        }

        if !policy.should_attempt_reconnect(reconnect_count) {
            error!(
                "Failed to reconnect to the live feed after {} attempts. Giving up.",
                policy.max_attempts
            );
            return;
        }
        reconnect_count += 1;

        info!(
            "Reconnecting to the live feed in {} ms... (attempt {}/{})",
            policy.interval.as_millis(),
            reconnect_count,
            policy.max_attempts
        );
        time::sleep(policy.interval).await;
    }
}

async fn stream_feed(
    url: &str,
    deltas: &mpsc::UnboundedSender<Vec<Message>>,
) -> Result<FeedEnd, tokio_tungstenite::tungstenite::Error> {
    let (mut stream, _) = connect_async(url).await?;
    info!("Connected to live feed {}", url);

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Frame::Text(text)) => match decode_messages_pushed(&text) {
                Ok(batch) if batch.is_empty() => {}
                Ok(batch) => {
                    if deltas.send(batch).is_err() {
                        return Ok(FeedEnd::Unsubscribed);
                    }
                }
                Err(e) => warn!("Ignoring unrecognised live feed frame: {}", e),
            },
            Ok(Frame::Close(_)) => {
                info!("Server closed the live feed");
                return Ok(FeedEnd::Disconnected);
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Live feed read error: {}", e);
                return Ok(FeedEnd::Disconnected);
            }
        }
    }

    Ok(FeedEnd::Disconnected)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_live_feed_url_from_http_origin() {
        // テスト項目: http / https のオリジンが ws / wss の /ws URL に変換される
        // given (前提条件):
        let plain = "http://127.0.0.1:8080";
        let secure = "https://kokuban.example/";

        // when (操作):
        let plain_url = live_feed_url(plain);
        let secure_url = live_feed_url(secure);

        // then (期待する結果):
        assert_eq!(plain_url, "ws://127.0.0.1:8080/ws");
        assert_eq!(secure_url, "wss://kokuban.example/ws");
    }

    #[test]
    fn test_live_feed_url_keeps_ws_scheme() {
        // テスト項目: 既に ws スキームの URL はそのまま /ws が付く
        // given (前提条件):
        let origin = "ws://localhost:3000";

        // when (操作):
        let url = live_feed_url(origin);

        // then (期待する結果):
        assert_eq!(url, "ws://localhost:3000/ws");
    }

    #[tokio::test]
    async fn test_subscription_ends_after_reconnect_budget() {
        // テスト項目: 接続できない場合は再接続上限の後に購読が終了する
        // given (前提条件):
        let feed = WebSocketLiveFeed::new("ws://127.0.0.1:9/ws").with_policy(ReconnectPolicy {
            max_attempts: 2,
            interval: Duration::from_millis(10),
        });

        // when (操作):
        let mut subscription = feed.subscribe();
        let delta = time::timeout(Duration::from_secs(10), subscription.recv()).await;

        // then (期待する結果):
        assert_eq!(delta, Ok(None));
    }
}
