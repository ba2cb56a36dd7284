//! Kokuban terminal viewer.
//!
//! Rotates the board's messages as stickers, surfaces new posts first and lets
//! you post from the prompt.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kokuban-client
//! cargo run --bin kokuban-client -- --server http://127.0.0.1:3000 --capacity 4
//! cargo run --bin kokuban-client -- --offline
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use kokuban_client::{
    board::{BoardConfig, config},
    domain::Gateway,
    infrastructure::{HttpGateway, InMemoryGateway, WebSocketLiveFeed, live_feed_url},
    ui::run_viewer,
};
use kokuban_shared::{
    logger::setup_logger,
    profanity::WordListGate,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "kokuban-client")]
#[command(about = "Terminal viewer for the Kokuban sticker blackboard", long_about = None)]
struct Args {
    /// Message store origin
    #[arg(short = 's', long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Use a built-in in-memory store instead of a server
    #[arg(long)]
    offline: bool,

    /// Do not subscribe to live updates
    #[arg(long)]
    fetch_only: bool,

    /// Number of stickers visible at once
    #[arg(short = 'c', long, default_value_t = config::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Milliseconds between stickers
    #[arg(long, default_value_t = 3000)]
    tick_ms: u64,

    /// Maximum post length in characters
    #[arg(long, default_value_t = config::DEFAULT_MAX_CONTENT_CHARS)]
    max_length: usize,
}

fn build_gateway(args: &Args, clock: Arc<dyn Clock>) -> Gateway {
    if args.offline {
        tracing::info!("Using the offline in-memory store");
        let store = Arc::new(InMemoryGateway::with_sample_messages(
            Arc::new(WordListGate::new()),
            clock,
        ));
        return if args.fetch_only {
            Gateway::fetch_only(store)
        } else {
            Gateway::live(store.clone(), store)
        };
    }

    let store = Arc::new(HttpGateway::new(args.server.as_str()));
    if args.fetch_only {
        Gateway::fetch_only(store)
    } else {
        let feed = Arc::new(WebSocketLiveFeed::new(live_feed_url(&args.server)));
        Gateway::live(store, feed)
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let config = BoardConfig {
        capacity: args.capacity,
        tick_interval: Duration::from_millis(args.tick_ms),
        max_content_chars: args.max_length,
        ..BoardConfig::default()
    };
    let gateway = build_gateway(&args, clock.clone());

    if let Err(e) = run_viewer(gateway, config, clock).await {
        tracing::error!("Viewer error: {}", e);
        std::process::exit(1);
    }
}
