//! ドメイン層
//!
//! - `value_object`: MessageId, MessageContent, Timestamp, SubscriberId
//! - `entity`: Message
//! - `factory`: ID の生成
//! - `repository` / `pusher`: Infrastructure 層が実装するインターフェース

pub mod entity;
pub mod error;
pub mod factory;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::Message;
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use factory::{MessageIdFactory, SubscriberIdFactory};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::MessageRepository;
pub use value_object::{
    DEFAULT_MAX_CONTENT_CHARS, MessageContent, MessageId, SubscriberId, Timestamp,
};
