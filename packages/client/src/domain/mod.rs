//! ドメイン層
//!
//! - `value_object`: MessageId（永続 ID と仮 ID）, MessageContent, Timestamp
//! - `entity`: Message, DisplayedSticker, RenderKey
//! - `gateway`: メッセージストアへのインターフェース（Infrastructure 層が実装）

pub mod entity;
pub mod error;
pub mod gateway;
pub mod value_object;

pub use entity::{DisplayedSticker, Message, Placement, RenderKey};
pub use error::{ContentError, GatewayError, PostError, ValueObjectError};
pub use gateway::{Gateway, LiveFeed, MessageGateway, Subscription};
pub use value_object::{MessageContent, MessageId, PROVISIONAL_ID_PREFIX, Timestamp};
