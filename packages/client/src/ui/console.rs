//! Interactive terminal session.

use std::sync::Arc;

use kokuban_shared::time::Clock;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use tracing::debug;

use super::{
    formatter::StickerFormatter,
    prompt::{PROMPT, redisplay_prompt},
};
use crate::{
    board::BoardConfig,
    domain::{Gateway, PostError},
    session::spawn_session,
};

/// One line typed at the prompt
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Board,
    Quit,
    Post(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        ":board" => Input::Board,
        ":quit" | ":q" => Input::Quit,
        text => Input::Post(text),
    }
}

/// Run the viewer until the user quits
///
/// Board activity is printed as it happens while a readline thread collects
/// posts and commands.
pub async fn run_viewer(
    gateway: Gateway,
    config: BoardConfig,
    clock: Arc<dyn Clock>,
) -> Result<(), Box<dyn std::error::Error>> {
    let max_chars = config.max_content_chars;
    let (session, mut events) = spawn_session(gateway, config, clock);

    print!("{}", StickerFormatter::format_permanent_warning(max_chars));
    redisplay_prompt();

    let render_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print!("{}", StickerFormatter::format_event(&event));
            redisplay_prompt();
        }
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line).ok();
                    let quitting = parse_input(line) == Input::Quit;
                    if input_tx.send(line.to_string()).is_err() || quitting {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    let mut session_lost = false;
    while let Some(line) = input_rx.recv().await {
        match parse_input(&line) {
            Input::Quit => break,
            Input::Board => match session.snapshot().await {
                Some(snapshot) => {
                    print!("{}", StickerFormatter::format_board(&snapshot));
                    redisplay_prompt();
                }
                None => {
                    session_lost = true;
                    break;
                }
            },
            Input::Post(text) => match session.post(text).await {
                Ok(message) => debug!("Post stored as {}", message.id),
                Err(PostError::Invalid(e)) => {
                    print!("{}", StickerFormatter::format_post_failed(&e.to_string()));
                    redisplay_prompt();
                }
                Err(PostError::SessionClosed) => {
                    session_lost = true;
                    break;
                }
                // already surfaced through the PostFailed event
                Err(e) => debug!("Post failed: {}", e),
            },
        }
    }

    session.shutdown().await;
    let _ = render_task.await;

    if session_lost {
        return Err("Board session stopped unexpectedly".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        // テスト項目: コロン付きのコマンドが認識される
        // given (前提条件):
        let lines = [":board", " :quit ", ":q"];

        // when (操作):
        let parsed: Vec<Input> = lines.iter().map(|l| parse_input(l)).collect();

        // then (期待する結果):
        assert_eq!(parsed, vec![Input::Board, Input::Quit, Input::Quit]);
    }

    #[test]
    fn test_parse_post() {
        // テスト項目: コマンド以外の入力は投稿として扱われる
        // given (前提条件):
        let line = "  坐看雲起時 ";

        // when (操作):
        let parsed = parse_input(line);

        // then (期待する結果):
        assert_eq!(parsed, Input::Post("坐看雲起時"));
    }
}
