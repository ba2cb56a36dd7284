//! Message store contracts.
//!
//! The store always supports fetching and submitting. Live updates are an
//! optional capability, so [`Gateway`] spells out which one a session gets.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::{sync::mpsc, task::JoinHandle};

use super::{
    entity::Message,
    error::GatewayError,
    value_object::MessageContent,
};

/// Fetch / submit side of the message store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Most recent messages, newest first. An empty store is not an error.
    async fn fetch_recent(&self) -> Result<Vec<Message>, GatewayError>;

    /// Persist a new message and return it with its durable ID and store timestamp
    async fn submit(&self, content: &MessageContent) -> Result<Message, GatewayError>;
}

/// Live update capability
pub trait LiveFeed: Send + Sync {
    /// Start receiving deltas. Dropping the returned subscription unsubscribes.
    fn subscribe(&self) -> Subscription;
}

/// Active live update subscription
///
/// Each received item is one delta batch. `None` from [`Subscription::recv`]
/// means the feed has ended for good.
#[derive(Debug)]
pub struct Subscription {
    deltas: mpsc::UnboundedReceiver<Vec<Message>>,
    worker: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(deltas: mpsc::UnboundedReceiver<Vec<Message>>, worker: JoinHandle<()>) -> Self {
        Self {
            deltas,
            worker: Some(worker),
        }
    }

    /// Subscription fed directly through a channel, with no background worker
    pub fn from_channel(deltas: mpsc::UnboundedReceiver<Vec<Message>>) -> Self {
        Self {
            deltas,
            worker: None,
        }
    }

    pub async fn recv(&mut self) -> Option<Vec<Message>> {
        self.deltas.recv().await
    }

    /// Stop the feed. Equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.deltas.close();
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}

/// Message store with its capability spelled out
#[derive(Clone)]
pub enum Gateway {
    /// Fetch and submit only. Remote posts stored after the initial fetch are not seen.
    FetchOnly(Arc<dyn MessageGateway>),
    /// Fetch and submit, plus live deltas
    Live {
        store: Arc<dyn MessageGateway>,
        feed: Arc<dyn LiveFeed>,
    },
}

impl Gateway {
    pub fn fetch_only(store: Arc<dyn MessageGateway>) -> Self {
        Gateway::FetchOnly(store)
    }

    pub fn live(store: Arc<dyn MessageGateway>, feed: Arc<dyn LiveFeed>) -> Self {
        Gateway::Live { store, feed }
    }

    pub fn store(&self) -> Arc<dyn MessageGateway> {
        match self {
            Gateway::FetchOnly(store) => Arc::clone(store),
            Gateway::Live { store, .. } => Arc::clone(store),
        }
    }

    /// Subscribe if the capability is present
    pub fn subscribe(&self) -> Option<Subscription> {
        match self {
            Gateway::FetchOnly(_) => None,
            Gateway::Live { feed, .. } => Some(feed.subscribe()),
        }
    }
}
