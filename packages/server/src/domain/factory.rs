//! ID factories.

use uuid::Uuid;

use super::value_object::{MessageId, SubscriberId};

/// Generates durable message IDs
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// UUID v4 in simple (hyphenless) form
    pub fn generate() -> MessageId {
        MessageId(Uuid::new_v4().simple().to_string())
    }
}

/// Generates live feed subscriber IDs
pub struct SubscriberIdFactory;

impl SubscriberIdFactory {
    pub fn generate() -> SubscriberId {
        SubscriberId(Uuid::new_v4().to_string())
    }
}
