//! Turn orchestration for Ragify.
//!
//! A chat submission runs through a small state machine:
//!
//! 1. **Gate** on a credential and on the grounding document
//! 2. **Capture** the input and disable further input
//! 3. **Generate**: commit the user turn, send instructions + grounding +
//!    full history to the backend, commit the assistant turn
//! 4. **Reset** to idle
//!
//! Front ends own the event loop and call
//! [`TurnOrchestrator::run_pass`] until it settles.

pub mod context;
pub mod instructions;
pub mod orchestrator;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use context::{ContextStore, PdfLoader, PlainTextLoader, PromptAssembler};
pub use instructions::{APP_TITLE, BACKEND_ERROR_PREFIX, EMPTY_REPLY_FALLBACK, SYSTEM_PROMPT};
pub use orchestrator::{Notice, PassOutcome, SessionEvent, TurnOrchestrator};
pub use session::{Session, TurnPhase};
