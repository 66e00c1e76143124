//! Prompt assembly: the message sequence sent on every turn.
//!
//! Layout, always in this order:
//!
//! 1. **Instructions** (system): persona, answer template, scope rules
//! 2. **Grounding** (system): framing sentence + the whole document
//! 3. **History**: every committed turn, verbatim and in order
//! 4. **New input** (user): the text being answered
//!
//! Nothing is trimmed, summarized or reordered: the full conversation is
//! replayed each turn, so `history.len() + 3` messages come out.

use ragify_core::message::{Message, Turn};

use crate::instructions::SYSTEM_PROMPT;

/// Builds backend requests. Stateless apart from its fixed text; create one
/// and reuse it.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    instructions: String,
    document_name: String,
}

impl PromptAssembler {
    pub fn new(instructions: impl Into<String>, document_name: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            document_name: document_name.into(),
        }
    }

    /// An assembler using the built-in RAG expert instructions.
    pub fn for_document(document_name: impl Into<String>) -> Self {
        Self::new(SYSTEM_PROMPT, document_name)
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Assemble the message sequence for one generation.
    pub fn build_messages(
        &self,
        history: &[Turn],
        new_user_text: &str,
        grounding: &str,
    ) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 3);
        messages.push(Message::system(&self.instructions));
        messages.push(Message::system(self.grounding_message(grounding)));
        messages.extend(history.iter().map(Turn::to_message));
        messages.push(Message::user(new_user_text));
        messages
    }

    fn grounding_message(&self, grounding: &str) -> String {
        format!(
            "You must use the following knowledge base as grounding context for your answers. \
             If something is not covered there, say so and suggest what info would be needed.\n\n\
             Knowledge base ({}):\n{}",
            self.document_name, grounding
        )
    }
}
