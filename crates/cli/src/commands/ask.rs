//! `ragify ask`: Answer one question and exit.

use std::path::Path;

use ragify_agent::{PassOutcome, Session, SessionEvent};
use ragify_core::Error;
use ragify_core::message::Speaker;

use super::CliResult;

pub async fn run(config_path: Option<&Path>, message: &str, api_key: Option<String>) -> CliResult {
    if message.trim().is_empty() {
        return Err(Error::Config {
            message: "Nothing to ask: --message is empty".into(),
        });
    }

    let config = super::load_config(config_path)?;
    let orchestrator = super::build_orchestrator(&config);
    let mut session = Session::new();

    let mut event = Some(SessionEvent::Submit(message.to_string()));
    loop {
        match orchestrator
            .run_pass(&mut session, api_key.as_deref(), event.take())
            .await
        {
            PassOutcome::Rerun | PassOutcome::Rejected => {}
            PassOutcome::Settled => break,
            PassOutcome::Blocked(notice) => return Err(notice.into()),
        }
    }

    let reply = session
        .turns()
        .iter()
        .rev()
        .find(|turn| turn.speaker() == Speaker::Assistant)
        .ok_or_else(|| Error::Internal("No reply was produced".into()))?;
    println!("{}", reply.content());

    Ok(())
}
