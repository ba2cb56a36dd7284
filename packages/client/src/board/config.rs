//! Board configuration.

use std::time::Duration;

pub const DEFAULT_CAPACITY: usize = 6;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(3000);
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 20;
pub const DEFAULT_SKIN_COUNT: u8 = 6;
/// Longest a post may stay pending before it is rolled back
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

/// Safe area for sticker placement
///
/// Positions are drawn from `margin..margin + span` percent on each axis,
/// rotations from `-max_rotation..=max_rotation` degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementBounds {
    pub margin: f64,
    pub span: f64,
    pub max_rotation: f64,
}

impl Default for PlacementBounds {
    fn default() -> Self {
        Self {
            margin: 10.0,
            span: 60.0,
            max_rotation: 15.0,
        }
    }
}

/// How a sticker's paper skin is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkinPolicy {
    /// Picked at display time
    #[default]
    Random,
    /// Derived from the message ID, so a message always wears the same paper
    FromMessageId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// Maximum number of stickers visible at once
    pub capacity: usize,
    pub tick_interval: Duration,
    pub submit_timeout: Duration,
    pub max_content_chars: usize,
    pub placement: PlacementBounds,
    pub skin_count: u8,
    pub skin_policy: SkinPolicy,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            tick_interval: DEFAULT_TICK_INTERVAL,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            placement: PlacementBounds::default(),
            skin_count: DEFAULT_SKIN_COUNT,
            skin_policy: SkinPolicy::default(),
        }
    }
}
