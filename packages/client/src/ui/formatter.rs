//! Board formatting utilities for terminal display.

use kokuban_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    board::BoardSnapshot,
    domain::{DisplayedSticker, Message},
    session::BoardEvent,
};

/// Characters per sticker line
const STICKER_LINE_CHARS: usize = 4;
const RULE: &str = "============================================================";

/// Board formatter for terminal display
pub struct StickerFormatter;

impl StickerFormatter {
    /// Format the startup notice shown above the compose prompt
    ///
    /// # Arguments
    ///
    /// * `max_chars` - Character budget for one post
    ///
    /// # Returns
    ///
    /// A formatted string with the permanent-post warning
    pub fn format_permanent_warning(max_chars: usize) -> String {
        format!(
            "\n{RULE}\n\
             Write up to {max_chars} characters and press Enter to post.\n\
             Posts are permanent and cannot be deleted.\n\
             Type :board to list visible stickers, :quit to leave.\n\
             {RULE}\n"
        )
    }

    /// Format any board event
    pub fn format_event(event: &BoardEvent) -> String {
        match event {
            BoardEvent::PoolSeeded { fetched, pool_size } => {
                Self::format_pool_seeded(*fetched, *pool_size)
            }
            BoardEvent::StickerShown(sticker) => Self::format_sticker_shown(sticker),
            BoardEvent::StickerRetired(sticker) => Self::format_sticker_retired(sticker),
            BoardEvent::StickerWithdrawn(sticker) => Self::format_sticker_withdrawn(sticker),
            BoardEvent::PostConfirmed { message, .. } => Self::format_post_confirmed(message),
            BoardEvent::PostFailed { reason, .. } => Self::format_post_failed(reason),
        }
    }

    pub fn format_pool_seeded(fetched: usize, pool_size: usize) -> String {
        format!("\nLoaded {} messages ({} on the board)\n", fetched, pool_size)
    }

    /// Format a sticker landing on the board
    ///
    /// # Arguments
    ///
    /// * `sticker` - The sticker that was just shown
    ///
    /// # Returns
    ///
    /// A formatted string with placement, skin and the content broken into sticker lines
    pub fn format_sticker_shown(sticker: &DisplayedSticker) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "\n\n+ paper #{} at ({:.0}%, {:.0}%) tilted {:+.0}°\n",
            sticker.skin, sticker.placement.x, sticker.placement.y, sticker.placement.rotation
        ));
        for line in sticker_lines(&sticker.message.content, STICKER_LINE_CHARS) {
            output.push_str(&format!("  | {}\n", line));
        }
        let origin = if sticker.message.id.is_provisional() {
            "sending...".to_string()
        } else {
            format!("posted at {}", timestamp_to_jst_rfc3339(sticker.message.created_at.value()))
        };
        output.push_str(&format!("  {} [{}]\n", origin, sticker.key));
        output
    }

    pub fn format_sticker_retired(sticker: &DisplayedSticker) -> String {
        format!("\n- {} [{}]\n", sticker.message.content, sticker.key)
    }

    pub fn format_sticker_withdrawn(sticker: &DisplayedSticker) -> String {
        format!("\nx withdrawn: {} [{}]\n", sticker.message.content, sticker.key)
    }

    /// Format a confirmation after the store accepted a post
    pub fn format_post_confirmed(message: &Message) -> String {
        format!(
            "\nposted at {}\n",
            timestamp_to_jst_rfc3339(message.created_at.value())
        )
    }

    /// Format the failure notice for a post
    pub fn format_post_failed(reason: &str) -> String {
        format!("\n! Post failed: {}\n", reason)
    }

    /// Format the currently visible stickers, oldest first
    pub fn format_board(snapshot: &BoardSnapshot) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", RULE));
        output.push_str(&format!(
            "Board: {} visible / {} known / {} queued / {} left in deck\n",
            snapshot.stickers.len(),
            snapshot.pool_size,
            snapshot.priority_backlog,
            snapshot.deck_remaining
        ));

        if snapshot.stickers.is_empty() {
            output.push_str("(No stickers yet)\n");
        } else {
            for sticker in &snapshot.stickers {
                output.push_str(&format!(
                    "#{} {} ({:.0}%, {:.0}%)\n",
                    sticker.skin, sticker.message.content, sticker.placement.x, sticker.placement.y
                ));
            }
        }

        output.push_str(&format!("{}\n", RULE));
        output
    }
}

/// Break content into fixed-width lines counted in characters
fn sticker_lines(content: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}
