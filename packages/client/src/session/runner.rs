//! Session task and its handle.

use std::{sync::Arc, time::Duration};

use kokuban_shared::time::Clock;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use super::event::BoardEvent;
use crate::{
    board::{Board, BoardConfig, BoardSnapshot, PendingPost, ShowOutcome},
    domain::{Gateway, GatewayError, Message, MessageGateway, PostError, Subscription, Timestamp},
};

type PostReply = oneshot::Sender<Result<Message, PostError>>;

enum Command {
    Post { content: String, reply: PostReply },
    Snapshot { reply: oneshot::Sender<BoardSnapshot> },
    Shutdown,
}

/// Results of work the session ran outside its own task
enum Completion {
    Fetched(Result<Vec<Message>, GatewayError>),
    Posted {
        pending: PendingPost,
        outcome: Result<Message, GatewayError>,
        reply: PostReply,
    },
}

enum Step {
    Command(Option<Command>),
    Completion(Completion),
    Delta(Option<Vec<Message>>),
    Tick,
}

/// Handle to a running session
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Post a message
    ///
    /// The sticker appears on the board before the store answers. Resolves once
    /// the store has confirmed or rejected the post.
    pub async fn post(&self, content: impl Into<String>) -> Result<Message, PostError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Post {
                content: content.into(),
                reply,
            })
            .map_err(|_| PostError::SessionClosed)?;
        response.await.map_err(|_| PostError::SessionClosed)?
    }

    /// Current board state, or `None` once the session has stopped
    pub async fn snapshot(&self) -> Option<BoardSnapshot> {
        let (reply, response) = oneshot::channel();
        self.commands.send(Command::Snapshot { reply }).ok()?;
        response.await.ok()
    }

    /// Stop ticking, unsubscribe from the live feed and wait for the task to end
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Err(e) = self.task.await {
            warn!("Board session task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Start a session with a fresh board, stamped with the clock's current time
pub fn spawn_session(
    gateway: Gateway,
    config: BoardConfig,
    clock: Arc<dyn Clock>,
) -> (SessionHandle, mpsc::UnboundedReceiver<BoardEvent>) {
    let board = Board::new(&config, Timestamp::new(clock.now_millis()));
    spawn_session_with_board(gateway, board, &config, clock)
}

/// Start a session around an existing board
///
/// Only the timing fields of `config` are used; the board keeps its own settings.
pub fn spawn_session_with_board(
    gateway: Gateway,
    board: Board,
    config: &BoardConfig,
    clock: Arc<dyn Clock>,
) -> (SessionHandle, mpsc::UnboundedReceiver<BoardEvent>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (completion_tx, completion_rx) = mpsc::unbounded_channel();

    // the live feed connects in the background; posts stored before it is up
    // reach this session only through the fetch, if at all
    let subscription = gateway.subscribe();
    let runner = SessionRunner {
        board,
        store: gateway.store(),
        clock,
        events: event_tx,
        completions: completion_tx,
        submit_timeout: config.submit_timeout,
    };
    let task = tokio::spawn(runner.run(
        command_rx,
        completion_rx,
        subscription,
        config.tick_interval,
    ));

    (
        SessionHandle {
            commands: command_tx,
            task,
        },
        event_rx,
    )
}

struct SessionRunner {
    board: Board,
    store: Arc<dyn MessageGateway>,
    clock: Arc<dyn Clock>,
    events: mpsc::UnboundedSender<BoardEvent>,
    completions: mpsc::UnboundedSender<Completion>,
    submit_timeout: Duration,
}

impl SessionRunner {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
        mut subscription: Option<Subscription>,
        tick_interval: Duration,
    ) {
        info!(
            "Board session started (live feed: {})",
            if subscription.is_some() { "on" } else { "off" }
        );
        self.spawn_fetch();

        let period = tick_interval.max(Duration::from_millis(1));
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let step = tokio::select! {
                command = commands.recv() => Step::Command(command),
                Some(done) = completions.recv() => Step::Completion(done),
                delta = next_delta(&mut subscription) => Step::Delta(delta),
                _ = ticker.tick() => Step::Tick,
            };

            match step {
                Step::Command(None | Some(Command::Shutdown)) => break,
                Step::Command(Some(command)) => self.handle_command(command),
                Step::Completion(done) => self.handle_completion(done),
                Step::Delta(Some(delta)) => self.handle_delta(delta),
                Step::Delta(None) => {
                    warn!("Live feed ended, continuing in fetch-only mode");
                    subscription = None;
                }
                Step::Tick => self.handle_tick(),
            }
        }

        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        info!("Board session stopped");
    }

    fn spawn_fetch(&self) {
        let store = Arc::clone(&self.store);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = store.fetch_recent().await;
            let _ = completions.send(Completion::Fetched(result));
        });
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Post { content, reply } => self.begin_post(&content, reply),
            Command::Snapshot { reply } => {
                let _ = reply.send(self.board.snapshot());
            }
            Command::Shutdown => {}
        }
    }

    fn begin_post(&mut self, content: &str, reply: PostReply) {
        let now = Timestamp::new(self.clock.now_millis());
        let (pending, outcome) = match self.board.begin_post(content, now) {
            Ok(started) => started,
            Err(e) => {
                debug!("Post rejected locally: {}", e);
                let _ = reply.send(Err(PostError::Invalid(e)));
                return;
            }
        };
        debug!("Showing optimistic post {}", pending.key());
        self.emit_show(outcome);

        let store = Arc::clone(&self.store);
        let completions = self.completions.clone();
        let submit_timeout = self.submit_timeout;
        tokio::spawn(async move {
            let outcome = time::timeout(submit_timeout, store.submit(pending.content()))
                .await
                .unwrap_or_else(|_| {
                    Err(GatewayError::Transport(format!(
                        "no response within {} ms",
                        submit_timeout.as_millis()
                    )))
                });
            let _ = completions.send(Completion::Posted {
                pending,
                outcome,
                reply,
            });
        });
    }

    fn handle_completion(&mut self, done: Completion) {
        match done {
            Completion::Fetched(Ok(messages)) => {
                let fetched = messages.len();
                self.board.seed(messages);
                let pool_size = self.board.pool().len();
                info!("Loaded {} messages (pool size: {})", fetched, pool_size);
                self.emit(BoardEvent::PoolSeeded { fetched, pool_size });
            }
            Completion::Fetched(Err(e)) => {
                warn!("Initial fetch failed, starting with an empty pool: {}", e);
            }
            Completion::Posted {
                pending,
                outcome: Ok(confirmed),
                reply,
            } => {
                let confirmation = self.board.confirm_post(&pending, confirmed.clone());
                info!(
                    "Post {} confirmed as {} (prioritized: {})",
                    pending.key(),
                    confirmed.id,
                    confirmation.prioritized
                );
                self.emit(BoardEvent::PostConfirmed {
                    key: pending.key().clone(),
                    message: confirmed.clone(),
                });
                let _ = reply.send(Ok(confirmed));
            }
            Completion::Posted {
                pending,
                outcome: Err(e),
                reply,
            } => {
                let error = PostError::from(e);
                warn!("Post {} failed: {}", pending.key(), error);
                let rejection = self.board.reject_post(&pending, error.to_string());
                if let Some(sticker) = rejection.withdrawn {
                    self.emit(BoardEvent::StickerWithdrawn(sticker));
                }
                self.emit(BoardEvent::PostFailed {
                    key: pending.key().clone(),
                    reason: error.to_string(),
                });
                let _ = reply.send(Err(error));
            }
        }
    }

    fn handle_delta(&mut self, delta: Vec<Message>) {
        self.board.merge(delta);
    }

    fn handle_tick(&mut self) {
        if let Some(outcome) = self.board.tick() {
            self.emit_show(outcome);
        }
    }

    fn emit_show(&self, outcome: ShowOutcome) {
        self.emit(BoardEvent::StickerShown(outcome.shown));
        for sticker in outcome.retired {
            self.emit(BoardEvent::StickerRetired(sticker));
        }
    }

    fn emit(&self, event: BoardEvent) {
        // nobody listening is fine
        let _ = self.events.send(event);
    }
}

async fn next_delta(subscription: &mut Option<Subscription>) -> Option<Vec<Message>> {
    match subscription {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use kokuban_shared::time::FixedClock;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::domain::{LiveFeed, MessageContent, MessageId, gateway::MockMessageGateway};

    const START: i64 = 1_700_000_000_000;
    const TICK: Duration = Duration::from_millis(3000);

    fn message(id: &str, created_at: i64) -> Message {
        Message::new(MessageId::new(id).unwrap(), id, Timestamp::new(created_at))
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(START))
    }

    fn board() -> Board {
        Board::with_rng(
            &BoardConfig::default(),
            Timestamp::new(START),
            StdRng::seed_from_u64(1),
        )
    }

    fn drain(events: &mut mpsc::UnboundedReceiver<BoardEvent>) -> Vec<BoardEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = events.try_recv() {
            drained.push(event);
        }
        drained
    }

    /// Live feed backed by a channel the test keeps the sending side of
    struct ChannelFeed {
        receiver: Mutex<Option<mpsc::UnboundedReceiver<Vec<Message>>>>,
    }

    impl ChannelFeed {
        fn new() -> (Self, mpsc::UnboundedSender<Vec<Message>>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                Self {
                    receiver: Mutex::new(Some(rx)),
                },
                tx,
            )
        }
    }

    impl LiveFeed for ChannelFeed {
        fn subscribe(&self) -> Subscription {
            let receiver = self
                .receiver
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| mpsc::unbounded_channel().1);
            Subscription::from_channel(receiver)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_degrades_to_empty_pool() {
        // テスト項目: 初回取得に失敗してもセッションは継続し、tick は何も表示しない
        // given (前提条件):
        let mut store = MockMessageGateway::new();
        store
            .expect_fetch_recent()
            .returning(|| Err(GatewayError::Transport("connection refused".to_string())));
        let gateway = Gateway::fetch_only(Arc::new(store));

        // when (操作):
        let (handle, mut events) = spawn_session_with_board(gateway, board(), &BoardConfig::default(), clock());
        time::sleep(TICK * 3 + Duration::from_millis(100)).await;
        let snapshot = handle.snapshot().await.unwrap();

        // then (期待する結果):
        assert_eq!(snapshot.pool_size, 0);
        assert!(snapshot.stickers.is_empty());
        assert!(drain(&mut events).is_empty());
        assert!(!handle.is_finished());
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeded_pool_shows_one_sticker_per_tick() {
        // テスト項目: 取得後は tick ごとに 1 枚ずつステッカーが表示される
        // given (前提条件):
        let mut store = MockMessageGateway::new();
        store
            .expect_fetch_recent()
            .returning(|| Ok((0..3).map(|i| message(&format!("m{i}"), START - 10)).collect()));
        let gateway = Gateway::fetch_only(Arc::new(store));

        // when (操作):
        let (handle, mut events) = spawn_session_with_board(gateway, board(), &BoardConfig::default(), clock());
        time::sleep(TICK * 2 + Duration::from_millis(100)).await;
        let snapshot = handle.snapshot().await.unwrap();

        // then (期待する結果):
        let events = drain(&mut events);
        assert_eq!(
            events[0],
            BoardEvent::PoolSeeded {
                fetched: 3,
                pool_size: 3
            }
        );
        let shown = events
            .iter()
            .filter(|e| matches!(e, BoardEvent::StickerShown(_)))
            .count();
        assert_eq!(shown, 2);
        assert_eq!(snapshot.stickers.len(), 2);
        assert_eq!(snapshot.deck_remaining, 1);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_delta_is_shown_on_next_tick() {
        // テスト項目: セッション開始後の新着差分は次の tick で優先的に表示される
        // given (前提条件):
        let mut store = MockMessageGateway::new();
        store
            .expect_fetch_recent()
            .returning(|| Ok((0..4).map(|i| message(&format!("m{i}"), START - 10)).collect()));
        let (feed, deltas) = ChannelFeed::new();
        let gateway = Gateway::live(Arc::new(store), Arc::new(feed));
        let (handle, mut events) = spawn_session_with_board(gateway, board(), &BoardConfig::default(), clock());
        time::sleep(Duration::from_millis(100)).await;

        // when (操作):
        deltas.send(vec![message("fresh", START + 50)]).unwrap();
        time::sleep(TICK).await;

        // then (期待する結果):
        let shown: Vec<String> = drain(&mut events)
            .into_iter()
            .filter_map(|e| match e {
                BoardEvent::StickerShown(s) => Some(s.message.id.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(shown, vec!["fresh"]);
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.pool_size, 5);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ended_live_feed_falls_back_to_fetch_only() {
        // テスト項目: ライブフィードが終了してもセッションはローテーションを続ける
        // given (前提条件):
        let mut store = MockMessageGateway::new();
        store
            .expect_fetch_recent()
            .returning(|| Ok(vec![message("m0", START - 10)]));
        let (feed, deltas) = ChannelFeed::new();
        let gateway = Gateway::live(Arc::new(store), Arc::new(feed));
        let (handle, mut events) = spawn_session_with_board(gateway, board(), &BoardConfig::default(), clock());

        // when (操作):
        drop(deltas);
        time::sleep(TICK * 2 + Duration::from_millis(100)).await;

        // then (期待する結果):
        let shown = drain(&mut events)
            .into_iter()
            .filter(|e| matches!(e, BoardEvent::StickerShown(_)))
            .count();
        assert_eq!(shown, 2);
        assert!(!handle.is_finished());
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_transport_failure_rolls_back() {
        // テスト項目: 送信失敗時は仮ステッカーが取り下げられ、失敗通知とエラーが返る
        // given (前提条件):
        let mut store = MockMessageGateway::new();
        store.expect_fetch_recent().returning(|| Ok(vec![]));
        store
            .expect_submit()
            .returning(|_| Err(GatewayError::Transport("timeout".to_string())));
        let gateway = Gateway::fetch_only(Arc::new(store));
        let (handle, mut events) = spawn_session_with_board(gateway, board(), &BoardConfig::default(), clock());

        // when (操作):
        let result = handle.post("hello").await;

        // then (期待する結果):
        assert_eq!(result, Err(PostError::Transport("timeout".to_string())));
        let events = drain(&mut events);
        let shown_key = events
            .iter()
            .find_map(|e| match e {
                BoardEvent::StickerShown(s) => Some(s.key.clone()),
                _ => None,
            })
            .unwrap();
        assert!(events.contains(&BoardEvent::PostFailed {
            key: shown_key.clone(),
            reason: "Transport error: timeout".to_string(),
        }));
        assert!(events.iter().any(
            |e| matches!(e, BoardEvent::StickerWithdrawn(s) if s.key == shown_key)
        ));
        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.stickers.is_empty());
        assert_eq!(snapshot.pool_size, 0);
        handle.shutdown().await;
    }

    /// Store that accepts the connection but never answers a submit
    struct SilentStore;

    #[async_trait::async_trait]
    impl MessageGateway for SilentStore {
        async fn fetch_recent(&self) -> Result<Vec<Message>, GatewayError> {
            Ok(vec![])
        }

        async fn submit(&self, _content: &MessageContent) -> Result<Message, GatewayError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_post_is_rolled_back_after_timeout() {
        // テスト項目: ストアが応答しない投稿はタイムアウト後に取り下げられ、失敗通知とエラーが返る
        // given (前提条件):
        let gateway = Gateway::fetch_only(Arc::new(SilentStore));
        let config = BoardConfig {
            submit_timeout: Duration::from_secs(2),
            ..BoardConfig::default()
        };
        let (handle, mut events) = spawn_session_with_board(gateway, board(), &config, clock());

        // when (操作):
        let result = time::timeout(Duration::from_secs(60), handle.post("hello")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Ok(Err(PostError::Transport("no response within 2000 ms".to_string())))
        );
        let events = drain(&mut events);
        let shown_key = events
            .iter()
            .find_map(|e| match e {
                BoardEvent::StickerShown(s) => Some(s.key.clone()),
                _ => None,
            })
            .unwrap();
        assert!(events.iter().any(
            |e| matches!(e, BoardEvent::StickerWithdrawn(s) if s.key == shown_key)
        ));
        assert!(events.iter().any(
            |e| matches!(e, BoardEvent::PostFailed { key, .. } if *key == shown_key)
        ));
        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.stickers.is_empty());
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_post_never_reaches_store() {
        // テスト項目: 空の投稿はストアに送られず、盤面も変わらない
        // given (前提条件):
        let mut store = MockMessageGateway::new();
        store.expect_fetch_recent().returning(|| Ok(vec![]));
        store.expect_submit().never();
        let gateway = Gateway::fetch_only(Arc::new(store));
        let (handle, mut events) = spawn_session_with_board(gateway, board(), &BoardConfig::default(), clock());

        // when (操作):
        let result = handle.post("   ").await;

        // then (期待する結果):
        assert!(matches!(result, Err(PostError::Invalid(_))));
        assert!(
            drain(&mut events)
                .iter()
                .all(|e| !matches!(e, BoardEvent::StickerShown(_)))
        );
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_post_joins_pool_once() {
        // テスト項目: 確定した投稿は確定 ID で 1 件だけプールに入り、仮ステッカーは残る
        // given (前提条件):
        let confirmed = message("durable", START + 1);
        let mut store = MockMessageGateway::new();
        store.expect_fetch_recent().returning(|| Ok(vec![]));
        let returned = confirmed.clone();
        store
            .expect_submit()
            .returning(move |_| Ok(returned.clone()));
        let gateway = Gateway::fetch_only(Arc::new(store));
        let (handle, _events) = spawn_session_with_board(gateway, board(), &BoardConfig::default(), clock());

        // when (操作):
        let result = handle.post("hello").await;

        // then (期待する結果):
        assert_eq!(result, Ok(confirmed.clone()));
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.pool_size, 1);
        assert_eq!(snapshot.stickers.len(), 1);
        assert_eq!(snapshot.stickers[0].message.id, confirmed.id);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_ends_event_stream() {
        // テスト項目: シャットダウン後はイベントストリームが閉じる
        // given (前提条件):
        let mut store = MockMessageGateway::new();
        store.expect_fetch_recent().returning(|| Ok(vec![]));
        let (feed, _deltas) = ChannelFeed::new();
        let gateway = Gateway::live(Arc::new(store), Arc::new(feed));
        let (handle, mut events) = spawn_session_with_board(gateway, board(), &BoardConfig::default(), clock());
        time::sleep(Duration::from_millis(100)).await;

        // when (操作):
        handle.shutdown().await;

        // then (期待する結果):
        while events.recv().await.is_some() {}
        assert!(events.recv().await.is_none());
    }
}
