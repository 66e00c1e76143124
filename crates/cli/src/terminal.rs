//! Terminal front end: reads input lines, renders the conversation.
//!
//! Stdin is read on a background task and forwarded over an mpsc channel,
//! so the chat loop can await input and passes in one place. The same task
//! runs the hidden key prompt, so nothing else reads the terminal meanwhile.

use std::io::Write;

use ragify_agent::Session;
use ragify_core::message::Speaker;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::warn;

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Submit(String),
    Clear,
    /// A key for this session, kept in memory only. An empty key clears it.
    SetKey(String),
    /// Bare `/key`: ask for the key without echoing it. The reader answers
    /// this itself and forwards a `SetKey`.
    PromptKey,
    Quit,
}

/// Classify a raw input line. Blank lines yield `None`.
pub fn parse_line(raw: &str) -> Option<InputLine> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    if matches!(line, "exit" | "quit" | "/exit" | "/quit" | ":q") {
        return Some(InputLine::Quit);
    }
    if line == "/clear" {
        return Some(InputLine::Clear);
    }
    if line == "/key" {
        return Some(InputLine::PromptKey);
    }
    // `/key <value>` is echoed and stays in scrollback; bare `/key` is not.
    if let Some(key) = line.strip_prefix("/key") {
        if key.starts_with(char::is_whitespace) {
            return Some(InputLine::SetKey(key.trim().to_string()));
        }
    }

    Some(InputLine::Submit(line.to_string()))
}

/// Start reading stdin. The channel closes on EOF or after a quit command.
pub fn spawn_reader() -> mpsc::Receiver<InputLine> {
    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        let mut lines = BufReader::new(io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(raw)) => {
                    let input = match parse_line(&raw) {
                        None => continue,
                        Some(InputLine::PromptKey) => match read_hidden_key().await {
                            Some(key) => InputLine::SetKey(key),
                            None => continue,
                        },
                        Some(input) => input,
                    };
                    let quit = input == InputLine::Quit;
                    if tx.send(input).await.is_err() || quit {
                        break;
                    }
                }
                Ok(None) => break, // EOF (Ctrl+D)
                Err(e) => {
                    warn!(error = %e, "Failed to read from stdin");
                    break;
                }
            }
        }
    });

    rx
}

/// Prompt for the API key on the terminal with echo disabled.
async fn read_hidden_key() -> Option<String> {
    let prompt = tokio::task::spawn_blocking(|| rpassword::prompt_password("  API key (hidden): "));
    match prompt.await {
        Ok(Ok(key)) => Some(key.trim().to_string()),
        Ok(Err(e)) => {
            warn!(error = %e, "Failed to read API key");
            None
        }
        Err(e) => {
            warn!(error = %e, "API key prompt task failed");
            None
        }
    }
}

/// Tracks how much of the conversation is already on screen.
#[derive(Debug, Default)]
pub struct Transcript {
    shown: usize,
}

impl Transcript {
    /// Print turns committed since the last render.
    ///
    /// User turns were echoed while typing, so only assistant turns are
    /// written. A shrunken conversation (after a clear) starts over.
    pub fn render(&mut self, session: &Session, out: &mut impl Write) -> std::io::Result<()> {
        let turns = session.turns();
        if turns.len() < self.shown {
            self.shown = 0;
        }

        for turn in &turns[self.shown..] {
            if turn.speaker() == Speaker::Assistant {
                writeln!(out)?;
                for line in turn.content().lines() {
                    writeln!(out, "  Assistant > {line}")?;
                }
                writeln!(out)?;
            }
        }
        self.shown = turns.len();
        out.flush()
    }
}
