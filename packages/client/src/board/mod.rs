//! 掲示板のスケジューリング中核
//!
//! - `pool`: 既知メッセージの集合（ID で重複排除、縮まない）
//! - `deck`: プールのシャッフル順。尽きたら再生成
//! - `priority`: 新着メッセージの優先レーン（FIFO）
//! - `display`: 表示中ステッカーの有限ウィンドウ（古い順に退場）
//! - `post`: 楽観的投稿の保留・確定・却下
//!
//! [`Board`] はこれらをまとめて所有し、すべての変更を 1 つの `&mut self` 経由で行う。

pub mod config;
pub mod deck;
pub mod display;
pub mod placement;
pub mod pool;
pub mod post;
pub mod priority;

use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

pub use config::{BoardConfig, PlacementBounds, SkinPolicy};
pub use deck::Deck;
pub use display::DisplayWindow;
pub use placement::StickerPlacer;
pub use pool::Pool;
pub use post::{Confirmation, PendingPost, PostState, Rejection};
pub use priority::PriorityQueue;

use crate::domain::{ContentError, DisplayedSticker, Message, MessageContent, Timestamp};

/// Result of putting one message on the board
#[derive(Debug, Clone, PartialEq)]
pub struct ShowOutcome {
    pub shown: DisplayedSticker,
    /// Stickers retired to stay within capacity, oldest first
    pub retired: Vec<DisplayedSticker>,
}

/// Result of merging a live delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    pub inserted: usize,
    pub prioritized: usize,
}

/// Point-in-time view of a board
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    /// Visible stickers, oldest first
    pub stickers: Vec<DisplayedSticker>,
    pub pool_size: usize,
    pub priority_backlog: usize,
    pub deck_remaining: usize,
}

/// One viewing session's scheduling state
#[derive(Debug)]
pub struct Board {
    session_started_at: Timestamp,
    max_content_chars: usize,
    pool: Pool,
    deck: Deck,
    priority: PriorityQueue,
    window: DisplayWindow,
    placer: StickerPlacer,
    rng: StdRng,
}

impl Board {
    pub fn new(config: &BoardConfig, session_started_at: Timestamp) -> Self {
        Self::with_rng(config, session_started_at, StdRng::from_entropy())
    }

    /// Board with a caller-provided RNG, for reproducible shuffles and placements
    pub fn with_rng(config: &BoardConfig, session_started_at: Timestamp, rng: StdRng) -> Self {
        Self {
            session_started_at,
            max_content_chars: config.max_content_chars,
            pool: Pool::new(),
            deck: Deck::new(),
            priority: PriorityQueue::new(),
            window: DisplayWindow::new(config.capacity),
            placer: StickerPlacer::new(config.placement, config.skin_count, config.skin_policy),
            rng,
        }
    }

    /// Union an initial fetch into the pool. Returns the number of new entries.
    ///
    /// Builds the first deck when none is in play.
    pub fn seed(&mut self, messages: Vec<Message>) -> usize {
        let inserted = self.pool.seed(messages);
        if self.deck.is_empty() && !self.pool.is_empty() {
            self.deck.regenerate(&self.pool, &mut self.rng);
        }
        debug!(
            "Seeded pool with {} new messages (pool size: {})",
            inserted,
            self.pool.len()
        );
        inserted
    }

    /// Merge a live delta
    ///
    /// Unseen messages join the pool. Those created after the session started
    /// are also queued ahead of the deck.
    pub fn merge(&mut self, delta: Vec<Message>) -> MergeOutcome {
        let before = self.pool.len();
        let fresh = self.pool.merge(delta, self.session_started_at);
        let inserted = self.pool.len() - before;
        let prioritized = fresh
            .into_iter()
            .map(|message| self.priority.admit(message))
            .filter(|admitted| *admitted)
            .count();
        debug!(
            "Merged delta: {} new, {} prioritized (pool size: {})",
            inserted,
            prioritized,
            self.pool.len()
        );
        MergeOutcome {
            inserted,
            prioritized,
        }
    }

    /// Show the next message: priority lane first, then the deck
    ///
    /// An exhausted deck is regenerated from the pool and drawn from in the
    /// same tick. Returns `None` while the pool is empty.
    pub fn tick(&mut self) -> Option<ShowOutcome> {
        let next = self.next_message()?;
        Some(self.show(next))
    }

    fn next_message(&mut self) -> Option<Message> {
        if let Some(message) = self.priority.pop_front() {
            return Some(message);
        }
        if self.deck.is_empty() {
            self.deck.regenerate(&self.pool, &mut self.rng);
        }
        self.deck.draw()
    }

    /// Put a message on the board as a new sticker instance
    pub fn show(&mut self, message: Message) -> ShowOutcome {
        let key = self.window.next_key(&message.id);
        let placement = self.placer.place(&mut self.rng);
        let skin = self.placer.skin(&mut self.rng, &message);
        let shown = DisplayedSticker {
            key,
            message,
            placement,
            skin,
        };
        let retired = self.window.push(shown.clone());
        ShowOutcome { shown, retired }
    }

    /// Validate a local post and show it immediately under a provisional ID
    ///
    /// Invalid content leaves the board untouched.
    pub fn begin_post(
        &mut self,
        raw: &str,
        now: Timestamp,
    ) -> Result<(PendingPost, ShowOutcome), ContentError> {
        let content = MessageContent::parse(raw, self.max_content_chars)?;
        let provisional = Message::provisional(&content, now);
        let outcome = self.show(provisional.clone());
        let pending = PendingPost::new(provisional, outcome.shown.key.clone(), content);
        Ok((pending, outcome))
    }

    /// Settle a post the store accepted
    ///
    /// The optimistic sticker keeps its key and now carries the confirmed
    /// record. The record joins the pool like any live message, so it is
    /// queued once if it is newer than the session start.
    pub fn confirm_post(&mut self, pending: &PendingPost, confirmed: Message) -> Confirmation {
        let id = confirmed.id.clone();
        let reconciled = self.window.replace_message(pending.key(), confirmed.clone());
        let merged = self.merge(vec![confirmed]);
        Confirmation {
            state: PostState::Confirmed(id),
            reconciled,
            prioritized: merged.prioritized > 0,
        }
    }

    /// Settle a post the store refused: withdraw the optimistic sticker
    pub fn reject_post(&mut self, pending: &PendingPost, reason: impl Into<String>) -> Rejection {
        Rejection {
            state: PostState::Rejected(reason.into()),
            withdrawn: self.window.remove(pending.key()),
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            stickers: self.window.iter().cloned().collect(),
            pool_size: self.pool.len(),
            priority_backlog: self.priority.len(),
            deck_remaining: self.deck.len(),
        }
    }

    pub fn session_started_at(&self) -> Timestamp {
        self.session_started_at
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn window(&self) -> &DisplayWindow {
        &self.window
    }

    pub fn priority_backlog(&self) -> usize {
        self.priority.len()
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.len()
    }
}
