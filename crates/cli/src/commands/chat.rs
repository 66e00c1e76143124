//! `ragify chat`: Interactive grounded chat.

use std::io::Write;
use std::path::Path;

use ragify_agent::{APP_TITLE, PassOutcome, Session, SessionEvent, TurnOrchestrator};
use tracing::debug;

use super::CliResult;
use crate::terminal::{self, InputLine, Transcript};

pub async fn run(config_path: Option<&Path>, api_key: Option<String>) -> CliResult {
    let config = super::load_config(config_path)?;
    let orchestrator = super::build_orchestrator(&config);

    println!();
    println!("  {APP_TITLE}");
    println!();
    println!("  Provider:  {}", config.provider);
    println!("  Model:     {}", orchestrator.model());
    println!("  Document:  {}", orchestrator.context().path().display());
    println!();
    println!("  Ask about retrievers, RAG pipelines, vector search or chunking.");
    println!("  Commands: /clear to reset the chat, /key to enter your API key (hidden),");
    println!("            exit to quit.");
    println!();

    let mut session = Session::new();
    let mut user_key = api_key.filter(|k| !k.trim().is_empty());
    let mut transcript = Transcript::default();
    let mut rx = terminal::spawn_reader();

    // The first pass shows any setup notice before the user types.
    let mut event = None;
    loop {
        settle(&orchestrator, &mut session, user_key.as_deref(), event.take(), &mut transcript)
            .await?;

        print!("  You > ");
        std::io::stdout().flush()?;

        match rx.recv().await {
            Some(InputLine::Submit(text)) => event = Some(SessionEvent::Submit(text)),
            Some(InputLine::Clear) => {
                event = Some(SessionEvent::Clear);
                println!("  Chat cleared.");
            }
            // The reader turns a bare `/key` into `SetKey` after the hidden prompt.
            Some(InputLine::PromptKey) => {}
            Some(InputLine::SetKey(key)) => {
                user_key = Some(key).filter(|k| !k.is_empty());
                debug!(credential_present = user_key.is_some(), "Session key updated");
                println!(
                    "  {}",
                    if user_key.is_some() {
                        "API key set for this session."
                    } else {
                        "API key cleared."
                    }
                );
            }
            Some(InputLine::Quit) | None => break,
        }
    }

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

/// Run passes until the orchestrator has nothing left to do, rendering
/// after each one.
async fn settle(
    orchestrator: &TurnOrchestrator,
    session: &mut Session,
    user_key: Option<&str>,
    mut event: Option<SessionEvent>,
    transcript: &mut Transcript,
) -> CliResult {
    let mut stdout = std::io::stdout();
    loop {
        let outcome = orchestrator.run_pass(session, user_key, event.take()).await;
        eprint!("\r                         \r");
        transcript.render(session, &mut stdout)?;

        match outcome {
            PassOutcome::Rerun => {
                if session.is_generating() {
                    eprint!("  Generating response...");
                }
            }
            PassOutcome::Rejected => {
                eprintln!("  Still answering the previous question; input ignored.");
            }
            PassOutcome::Settled => return Ok(()),
            PassOutcome::Blocked(notice) => {
                println!("  {notice}");
                return Ok(());
            }
        }
    }
}
