//! UseCase error types.

use thiserror::Error;

use crate::domain::ValueObjectError;

/// 投稿失敗
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostMessageError {
    /// 空、または長すぎる
    #[error("{0}")]
    InvalidContent(#[from] ValueObjectError),

    #[error("Profanity is not allowed")]
    Profane,

    #[error("Failed to store message: {0}")]
    Storage(String),
}

/// メッセージ取得失敗
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchMessagesError {
    #[error("Failed to load messages: {0}")]
    Storage(String),
}
