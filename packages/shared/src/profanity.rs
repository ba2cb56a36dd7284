//! Profanity gate backed by word lists.
//!
//! A small base list is always available. A larger list can be downloaded
//! lazily the first time a text is checked; if that download fails the gate
//! keeps working with the base list instead of blocking posts.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;

/// Community maintained Chinese word list
pub const DEFAULT_WORD_LIST_URL: &str = "https://raw.githubusercontent.com/LDNOOBW/List-of-Dirty-Naughty-Obscene-and-Otherwise-Bad-Words/master/zh";

const BASE_WORDS: [&str; 8] = [
    "fuck", "fucking", "shit", "bitch", "asshole", "bastard", "cunt", "dick",
];

const MASK: char = '*';

/// Upper bound on a word list download; past it the gate stays on its base list
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Word list loading errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfanityError {
    #[error("Failed to download word list: {0}")]
    Download(String),

    #[error("Word list request returned status {0}")]
    Status(u16),

    #[error("Word list was not loaded within {0} ms")]
    Timeout(u128),
}

/// Yes/no profanity predicate plus a text-cleaning function
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfanityGate: Send + Sync {
    /// Whether `text` contains a listed word. Waits for the word list on first use.
    async fn check(&self, text: &str) -> bool;

    /// `text` with every listed word masked, using whatever list is loaded now.
    fn clean(&self, text: &str) -> String;
}

/// Source of additional words for [`WordListGate`]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordListLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<String>, ProfanityError>;
}

/// Downloads a newline separated word list over HTTP
pub struct HttpWordListLoader {
    client: reqwest::Client,
    url: String,
}

impl HttpWordListLoader {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_LOAD_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to a default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl WordListLoader for HttpWordListLoader {
    async fn load(&self) -> Result<Vec<String>, ProfanityError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ProfanityError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProfanityError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProfanityError::Download(e.to_string()))?;

        Ok(parse_word_list(&body))
    }
}

/// Split a newline separated list, dropping blank lines
pub fn parse_word_list(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Profanity gate over a base list and an optional lazily loaded list
pub struct WordListGate {
    base: Vec<String>,
    loader: Option<Arc<dyn WordListLoader>>,
    load_timeout: Duration,
    extra: OnceCell<Vec<String>>,
}

impl Default for WordListGate {
    fn default() -> Self {
        Self::with_words(BASE_WORDS.iter().map(|w| w.to_string()).collect())
    }
}

impl WordListGate {
    /// Gate over the built-in base list only
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate over a custom base list
    pub fn with_words(words: Vec<String>) -> Self {
        Self {
            base: words.into_iter().map(|w| w.to_lowercase()).collect(),
            loader: None,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            extra: OnceCell::new(),
        }
    }

    /// Attach a loader whose words are fetched on first check
    pub fn with_loader(mut self, loader: Arc<dyn WordListLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// How long the first check may wait for the loader
    pub fn with_load_timeout(mut self, load_timeout: Duration) -> Self {
        self.load_timeout = load_timeout;
        self
    }

    /// Load the extra list once. Failures leave the gate on its base list.
    pub async fn ensure_loaded(&self) {
        let Some(loader) = &self.loader else {
            return;
        };

        self.extra
            .get_or_init(|| async {
                let loaded = tokio::time::timeout(self.load_timeout, loader.load())
                    .await
                    .unwrap_or_else(|_| {
                        Err(ProfanityError::Timeout(self.load_timeout.as_millis()))
                    });
                match loaded {
                    Ok(words) => {
                        tracing::info!("Loaded {} additional profanity words", words.len());
                        words
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load profanity list, using base list: {}", e);
                        Vec::new()
                    }
                }
            })
            .await;
    }

    /// Whether the extra list has been resolved (successfully or not)
    pub fn is_loaded(&self) -> bool {
        self.loader.is_none() || self.extra.initialized()
    }

    fn words(&self) -> impl Iterator<Item = &str> {
        self.base
            .iter()
            .chain(self.extra.get().into_iter().flatten())
            .map(String::as_str)
    }

    /// Per-character mask of the positions covered by a listed word
    fn matched_mask(&self, chars: &[char]) -> Vec<bool> {
        let lowered: Vec<char> = chars
            .iter()
            .map(|c| c.to_lowercase().next().unwrap_or(*c))
            .collect();
        let mut mask = vec![false; chars.len()];

        for word in self.words() {
            let needle: Vec<char> = word.chars().collect();
            if needle.is_empty() || needle.len() > lowered.len() {
                continue;
            }
            let whole_token = word.is_ascii();

            for start in 0..=(lowered.len() - needle.len()) {
                let end = start + needle.len();
                if lowered[start..end] != needle[..] {
                    continue;
                }
                if whole_token && !is_token_boundary(&lowered, start, end) {
                    continue;
                }
                mask[start..end].iter_mut().for_each(|m| *m = true);
            }
        }

        mask
    }
}

/// ASCII words only count when not glued to other alphanumerics
fn is_token_boundary(chars: &[char], start: usize, end: usize) -> bool {
    let before = start == 0 || !chars[start - 1].is_alphanumeric();
    let after = end == chars.len() || !chars[end].is_alphanumeric();
    before && after
}

#[async_trait]
impl ProfanityGate for WordListGate {
    async fn check(&self, text: &str) -> bool {
        self.ensure_loaded().await;
        let chars: Vec<char> = text.chars().collect();
        self.matched_mask(&chars).into_iter().any(|m| m)
    }

    fn clean(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mask = self.matched_mask(&chars);
        chars
            .into_iter()
            .zip(mask)
            .map(|(c, masked)| if masked { MASK } else { c })
            .collect()
    }
}
