//! Prompt utilities for the viewer.

use std::io::Write;

pub const PROMPT: &str = "kokuban> ";

/// Redisplay the prompt after printing board activity
pub fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}
