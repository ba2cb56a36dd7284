//! In-process message store.
//!
//! Behaves like the remote store: profanity-gated submission, a bounded
//! newest-first fetch and live pushes for every stored message. Used for
//! offline viewing and in tests.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use kokuban_shared::{profanity::ProfanityGate, time::Clock};
use tokio::{
    sync::{Mutex, broadcast, mpsc},
    time,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{
    GatewayError, LiveFeed, Message, MessageContent, MessageGateway, MessageId, Subscription,
    Timestamp,
};

pub const DEFAULT_FETCH_LIMIT: usize = 50;
const LIVE_CHANNEL_CAPACITY: usize = 64;
const PROFANITY_REJECTION: &str = "Profanity is not allowed";

const SAMPLE_MESSAGES: [&str; 5] = [
    "行到水窮處",
    "坐看雲起時",
    "偶然值林叟",
    "談笑無還期",
    "中歲頗好道",
];

pub struct InMemoryGateway {
    messages: Mutex<Vec<Message>>,
    gate: Arc<dyn ProfanityGate>,
    clock: Arc<dyn Clock>,
    updates: broadcast::Sender<Vec<Message>>,
    fetch_limit: usize,
    latency: Duration,
}

impl InMemoryGateway {
    pub fn new(gate: Arc<dyn ProfanityGate>, clock: Arc<dyn Clock>) -> Self {
        let (updates, _) = broadcast::channel(LIVE_CHANNEL_CAPACITY);
        Self {
            messages: Mutex::new(Vec::new()),
            gate,
            clock,
            updates,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            latency: Duration::ZERO,
        }
    }

    /// Store pre-filled with a few sample notes dated before now
    pub fn with_sample_messages(gate: Arc<dyn ProfanityGate>, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now_millis();
        let samples = SAMPLE_MESSAGES
            .iter()
            .zip(1i64..)
            .filter_map(|(content, i)| {
                let id = MessageId::new(i.to_string()).ok()?;
                Some(Message::new(id, *content, Timestamp::new(now - i * 100_000)))
            })
            .collect();
        Self::new(gate, clock).with_messages(samples)
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Mutex::new(messages);
        self
    }

    pub fn with_fetch_limit(mut self, fetch_limit: usize) -> Self {
        self.fetch_limit = fetch_limit;
        self
    }

    /// Simulated round trip applied to fetch and submit
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Store a message as if another viewer had posted it, and push it live
    pub async fn publish(&self, message: Message) {
        self.messages.lock().await.push(message.clone());
        self.push_live(vec![message]);
    }

    pub async fn count(&self) -> usize {
        self.messages.lock().await.len()
    }

    fn push_live(&self, batch: Vec<Message>) {
        // no subscribers is fine
        if let Ok(receivers) = self.updates.send(batch) {
            debug!("Pushed live update to {} subscribers", receivers);
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl MessageGateway for InMemoryGateway {
    async fn fetch_recent(&self) -> Result<Vec<Message>, GatewayError> {
        self.simulate_latency().await;
        let mut messages = self.messages.lock().await.clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        messages.truncate(self.fetch_limit);
        Ok(messages)
    }

    async fn submit(&self, content: &MessageContent) -> Result<Message, GatewayError> {
        self.simulate_latency().await;
        if self.gate.check(content.as_str()).await {
            debug!("Rejected profane post: {}", self.gate.clean(content.as_str()));
            return Err(GatewayError::Rejected(PROFANITY_REJECTION.to_string()));
        }

        let id = MessageId::new(Uuid::new_v4().simple().to_string())
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let message = Message::new(
            id,
            content.as_str(),
            Timestamp::new(self.clock.now_millis()),
        );
        self.publish(message.clone()).await;
        Ok(message)
    }
}

impl LiveFeed for InMemoryGateway {
    fn subscribe(&self) -> Subscription {
        let mut updates = self.updates.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(async move {
            loop {
                match updates.recv().await {
                    Ok(batch) => {
                        if tx.send(batch).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Live subscriber lagged, skipped {} updates", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Subscription::new(rx, worker)
    }
}
