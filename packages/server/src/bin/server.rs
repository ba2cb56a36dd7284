//! Kokuban message store.
//!
//! Serves the most recent messages over HTTP, accepts new anonymous posts and
//! pushes each accepted post to WebSocket live subscribers.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kokuban-server
//! cargo run --bin kokuban-server -- --host 0.0.0.0 --port 3000 --no-remote-words
//! ```

use std::sync::Arc;

use clap::Parser;
use kokuban_server::{
    domain::DEFAULT_MAX_CONTENT_CHARS,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryMessageRepository},
    ui::Server,
    usecase::{
        DEFAULT_FETCH_LIMIT, GetRecentMessagesUseCase, PostMessageUseCase,
        SubscribeLiveFeedUseCase,
    },
};
use kokuban_shared::{
    logger::setup_logger,
    profanity::{DEFAULT_WORD_LIST_URL, HttpWordListLoader, WordListGate},
    time::SystemClock,
};

#[derive(Parser, Debug)]
#[command(name = "kokuban-server")]
#[command(about = "Message store for the Kokuban sticker blackboard", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Number of recent messages served to viewers
    #[arg(long, default_value_t = DEFAULT_FETCH_LIMIT)]
    fetch_limit: usize,

    /// Maximum message length in characters
    #[arg(long, default_value_t = DEFAULT_MAX_CONTENT_CHARS)]
    max_length: usize,

    /// Additional profanity word list to download on first use
    #[arg(long, default_value = DEFAULT_WORD_LIST_URL)]
    word_list_url: String,

    /// Only use the built-in profanity word list
    #[arg(long)]
    no_remote_words: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository / MessagePusher / ProfanityGate
    // 2. UseCases
    // 3. Server

    // 1. Infrastructure
    let repository = Arc::new(InMemoryMessageRepository::default());
    let message_pusher = Arc::new(WebSocketMessagePusher::default());
    let mut gate = WordListGate::new();
    if !args.no_remote_words {
        gate = gate.with_loader(Arc::new(HttpWordListLoader::new(args.word_list_url)));
    }
    let gate = Arc::new(gate);

    // Warm the word list in the background; the first check still waits for it
    let preload = gate.clone();
    tokio::spawn(async move { preload.ensure_loaded().await });

    // 2. UseCases
    let get_recent_messages_usecase = Arc::new(GetRecentMessagesUseCase::new(
        repository.clone(),
        args.fetch_limit,
    ));
    let post_message_usecase = Arc::new(PostMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        gate,
        Arc::new(SystemClock),
        args.max_length,
    ));
    let subscribe_live_feed_usecase = Arc::new(SubscribeLiveFeedUseCase::new(message_pusher));

    // 3. Create and run the server
    let server = Server::new(
        get_recent_messages_usecase,
        post_message_usecase,
        subscribe_live_feed_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
