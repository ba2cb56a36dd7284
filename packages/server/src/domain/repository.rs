//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Message, RepositoryError};

/// Message Repository trait
///
/// 投稿は永続的で、削除や編集のインターフェースは持たない。
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを保存
    async fn add_message(&self, message: Message) -> Result<(), RepositoryError>;

    /// 新しい順に最大 `limit` 件のメッセージを取得
    async fn recent_messages(&self, limit: usize) -> Result<Vec<Message>, RepositoryError>;

    /// 保存されているメッセージ数を取得
    async fn count_messages(&self) -> usize;
}
