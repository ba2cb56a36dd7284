//! Terminal viewer.

pub mod console;
pub mod formatter;
pub mod prompt;

pub use console::run_viewer;
pub use formatter::StickerFormatter;
