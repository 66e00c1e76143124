//! Conversation state for one chat session.
//!
//! The in-flight flag and the pending input are one piece of state: the
//! pending text lives inside the non-idle phases, so "pending input present"
//! and "generation in flight" can never disagree.
//!
//! Only the turn orchestrator mutates a session; front ends read it to render.

use ragify_core::message::{SessionId, Speaker, Turn};

/// Where a session is in the submission cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TurnPhase {
    /// Nothing pending; input is enabled.
    #[default]
    Idle,
    /// Input captured and input disabled; the user turn is not committed yet.
    AwaitingSubmission { pending: String },
    /// The user turn is committed and the backend is being called.
    Generating { pending: String },
}

/// Per-session state: the conversation log plus the submission phase.
#[derive(Debug, Clone, Default)]
pub struct Session {
    id: SessionId,
    conversation: Vec<Turn>,
    phase: TurnPhase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Committed turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.conversation
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    /// True while a submission is being processed; input must stay disabled.
    pub fn is_generating(&self) -> bool {
        !matches!(self.phase, TurnPhase::Idle)
    }

    /// The captured text not yet committed as a full turn pair.
    pub fn pending_input(&self) -> Option<&str> {
        match &self.phase {
            TurnPhase::Idle => None,
            TurnPhase::AwaitingSubmission { pending } | TurnPhase::Generating { pending } => {
                Some(pending)
            }
        }
    }

    /// Record a submission. Callers check `is_generating()` first.
    pub(crate) fn capture(&mut self, text: String) {
        debug_assert!(!self.is_generating());
        self.phase = TurnPhase::AwaitingSubmission { pending: text };
    }

    /// Commit the pending user turn (once) and return the text to answer.
    ///
    /// Re-entering while already `Generating` does not commit the user turn
    /// a second time, unless a clear dropped it in between.
    pub(crate) fn start_generation(&mut self) -> Option<String> {
        match std::mem::take(&mut self.phase) {
            TurnPhase::Idle => None,
            TurnPhase::AwaitingSubmission { pending } => {
                self.conversation.push(Turn::user(&pending));
                self.phase = TurnPhase::Generating {
                    pending: pending.clone(),
                };
                Some(pending)
            }
            TurnPhase::Generating { pending } => {
                let committed = self.conversation.last().is_some_and(|turn| {
                    turn.speaker() == Speaker::User && turn.content() == pending
                });
                if !committed {
                    self.conversation.push(Turn::user(&pending));
                }
                self.phase = TurnPhase::Generating {
                    pending: pending.clone(),
                };
                Some(pending)
            }
        }
    }

    /// Commit the assistant turn and return to `Idle`.
    pub(crate) fn finish_generation(&mut self, reply: impl Into<String>) {
        self.conversation.push(Turn::assistant(reply));
        self.phase = TurnPhase::Idle;
    }

    /// Drop the whole conversation. The phase is left as it is.
    pub(crate) fn clear_conversation(&mut self) {
        self.conversation.clear();
    }
}
