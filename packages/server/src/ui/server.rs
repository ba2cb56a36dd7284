//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::usecase::{GetRecentMessagesUseCase, PostMessageUseCase, SubscribeLiveFeedUseCase};

use super::{
    handler::{get_messages, health_check, live_feed_handler, post_message},
    signal::shutdown_signal,
    state::AppState,
};

/// Kokuban message store server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     get_recent_messages_usecase,
///     post_message_usecase,
///     subscribe_live_feed_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// GetRecentMessagesUseCase（最新メッセージ取得のユースケース）
    get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
    /// PostMessageUseCase（投稿のユースケース）
    post_message_usecase: Arc<PostMessageUseCase>,
    /// SubscribeLiveFeedUseCase（ライブ購読のユースケース）
    subscribe_live_feed_usecase: Arc<SubscribeLiveFeedUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
        post_message_usecase: Arc<PostMessageUseCase>,
        subscribe_live_feed_usecase: Arc<SubscribeLiveFeedUseCase>,
    ) -> Self {
        Self {
            get_recent_messages_usecase,
            post_message_usecase,
            subscribe_live_feed_usecase,
        }
    }

    /// Build the router with all endpoints
    pub fn into_router(self) -> Router {
        let app_state = Arc::new(AppState {
            get_recent_messages_usecase: self.get_recent_messages_usecase,
            post_message_usecase: self.post_message_usecase,
            subscribe_live_feed_usecase: self.subscribe_live_feed_usecase,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(live_feed_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/messages", get(get_messages).post(post_message))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the message store server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.into_router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Kokuban server listening on {}", listener.local_addr()?);
        tracing::info!("Live feed: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
