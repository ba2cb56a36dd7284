//! HTTP API tests against a server bound to an ephemeral port.

use std::sync::Arc;

use kokuban_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryMessageRepository},
    ui::Server,
    usecase::{GetRecentMessagesUseCase, PostMessageUseCase, SubscribeLiveFeedUseCase},
};
use kokuban_shared::{
    dto::{ErrorResponse, MessageDto, PostMessageRequest},
    profanity::WordListGate,
    time::SystemClock,
};

/// Helper struct to manage an in-process server lifecycle
struct TestServer {
    base_url: String,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start(fetch_limit: usize) -> Self {
        let repository = Arc::new(InMemoryMessageRepository::default());
        let message_pusher = Arc::new(WebSocketMessagePusher::default());
        let server = Server::new(
            Arc::new(GetRecentMessagesUseCase::new(repository.clone(), fetch_limit)),
            Arc::new(PostMessageUseCase::new(
                repository,
                message_pusher.clone(),
                Arc::new(WordListGate::new()),
                Arc::new(SystemClock),
                20,
            )),
            Arc::new(SubscribeLiveFeedUseCase::new(message_pusher)),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let app = server.into_router();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            base_url: format!("http://{}", addr),
            task,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn post(server: &TestServer, content: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(server.url("/api/messages"))
        .json(&PostMessageRequest {
            content: content.to_string(),
        })
        .send()
        .await
        .expect("Request failed")
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが ok を返す
    // given (前提条件):
    let server = TestServer::start(50).await;

    // when (操作):
    let body: serde_json::Value = reqwest::get(server.url("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body["status"], "ok");
    assert_eq!(body["messages"], 0);
}

#[tokio::test]
async fn test_empty_store_returns_empty_list() {
    // テスト項目: メッセージがない場合は空の配列が返される
    // given (前提条件):
    let server = TestServer::start(50).await;

    // when (操作):
    let response = reqwest::get(server.url("/api/messages")).await.unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let messages: Vec<MessageDto> = response.json().await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_post_then_fetch_newest_first() {
    // テスト項目: 投稿したメッセージが新しい順で取得できる
    // given (前提条件):
    let server = TestServer::start(50).await;
    let first = post(&server, "行到水窮處").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = post(&server, "坐看雲起時").await;

    // when (操作):
    let messages: Vec<MessageDto> = reqwest::get(server.url("/api/messages"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(first.status(), reqwest::StatusCode::CREATED);
    assert_eq!(second.status(), reqwest::StatusCode::CREATED);
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["坐看雲起時", "行到水窮處"]);
}

#[tokio::test]
async fn test_fetch_is_bounded() {
    // テスト項目: 取得件数は fetch_limit で制限される
    // given (前提条件):
    let server = TestServer::start(2).await;
    for i in 0..3 {
        post(&server, &format!("note {i}")).await;
    }

    // when (操作):
    let messages: Vec<MessageDto> = reqwest::get(server.url("/api/messages"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(messages.len(), 2);
}

#[tokio::test]
async fn test_profane_post_is_rejected_with_reason() {
    // テスト項目: 不適切語を含む投稿は 422 と理由付きで拒否される
    // given (前提条件):
    let server = TestServer::start(50).await;

    // when (操作):
    let response = post(&server, "bad word shit").await;

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.error, "Profanity is not allowed");
}

#[tokio::test]
async fn test_too_long_post_is_rejected() {
    // テスト項目: 上限を超える投稿は 422 で拒否され、保存されない
    // given (前提条件):
    let server = TestServer::start(50).await;

    // when (操作):
    let response = post(&server, &"x".repeat(21)).await;
    let messages: Vec<MessageDto> = reqwest::get(server.url("/api/messages"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    assert!(messages.is_empty());
}
