//! The turn orchestrator: the chat state machine.
//!
//! A front end drives a session by calling [`TurnOrchestrator::run_pass`]
//! once per event, then again for as long as the outcome asks for a rerun.
//! A submission therefore takes two passes:
//!
//! 1. **Capture**: the text becomes pending input, input is disabled, and a
//!    rerun is requested so the "generating" state is rendered first.
//! 2. **Generate**: the user turn is committed, the backend is called once,
//!    the assistant turn (reply, fallback or error text) is committed, the
//!    session returns to `Idle`, and another rerun is requested.
//!
//! Backend failures never escape a pass: they become assistant turns, so the
//! session can never be left stuck in a generating phase.

use std::sync::Arc;

use ragify_config::{AppConfig, CredentialResolver};
use ragify_core::error::{ContextError, ProviderError};
use ragify_core::message::Message;
use ragify_core::provider::{ProviderFactory, ProviderRequest};
use ragify_core::Credential;
use tracing::{debug, info, warn};

use crate::context::{ContextStore, PromptAssembler};
use crate::instructions::{BACKEND_ERROR_PREFIX, EMPTY_REPLY_FALLBACK};
use crate::session::Session;

/// Something the user did since the last pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Text entered in the chat input.
    Submit(String),
    /// The "clear chat" action.
    Clear,
}

/// Why a pass stopped before the chat became usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    CredentialMissing { env_vars: Vec<String> },
    ContextUnavailable(ContextError),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CredentialMissing { env_vars } => write!(
                f,
                "Add your Gemini API key to start chatting (type /key, pass --api-key, or set {}).",
                env_vars.join(" or ")
            ),
            Self::ContextUnavailable(err) => write!(f, "{err}"),
        }
    }
}

impl From<Notice> for ragify_core::Error {
    fn from(notice: Notice) -> Self {
        match notice {
            Notice::ContextUnavailable(err) => Self::Context(err),
            missing @ Notice::CredentialMissing { .. } => {
                Self::Provider(ProviderError::NotConfigured(missing.to_string()))
            }
        }
    }
}

/// The result of one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// State changed; run another pass before waiting for input.
    Rerun,
    /// Nothing left to do until the next user event.
    Settled,
    /// A submission arrived while a generation was in flight and was dropped.
    Rejected,
    /// A gate failed; render the notice and stop this pass.
    Blocked(Notice),
}

impl PassOutcome {
    /// Whether the driver should immediately run another pass.
    ///
    /// A rejection only happens while a generation is pending, which still
    /// needs a pass to complete.
    pub fn wants_rerun(&self) -> bool {
        matches!(self, Self::Rerun | Self::Rejected)
    }
}

/// Advances sessions through the submission cycle.
pub struct TurnOrchestrator {
    factory: Arc<dyn ProviderFactory>,
    context: Arc<ContextStore>,
    assembler: PromptAssembler,
    credentials: CredentialResolver,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl TurnOrchestrator {
    /// Create an orchestrator with the default model and temperature.
    pub fn new(
        factory: Arc<dyn ProviderFactory>,
        context: Arc<ContextStore>,
        credentials: CredentialResolver,
    ) -> Self {
        let assembler = PromptAssembler::for_document(context.document_name());
        Self {
            factory,
            context,
            assembler,
            credentials,
            model: "gemini-2.5-flash".into(),
            temperature: 0.2,
            max_tokens: None,
        }
    }

    /// Create an orchestrator from the loaded configuration.
    pub fn from_config(
        config: &AppConfig,
        factory: Arc<dyn ProviderFactory>,
        context: Arc<ContextStore>,
    ) -> Self {
        let orchestrator = Self::new(factory, context, config.credential_resolver())
            .with_model(&config.model)
            .with_temperature(config.temperature);
        match config.max_tokens {
            Some(max) => orchestrator.with_max_tokens(max),
            None => orchestrator,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn context(&self) -> &ContextStore {
        &self.context
    }

    /// Run one pass of the state machine.
    ///
    /// `user_key` is whatever the user typed as an API key this session; it
    /// takes precedence over the environment.
    pub async fn run_pass(
        &self,
        session: &mut Session,
        user_key: Option<&str>,
        event: Option<SessionEvent>,
    ) -> PassOutcome {
        // Clear is honored before any gate.
        if event == Some(SessionEvent::Clear) {
            info!(session = %session.id(), dropped = session.turns().len(), "Clearing conversation");
            session.clear_conversation();
            return PassOutcome::Rerun;
        }

        let credential = self.credentials.resolve(user_key);
        if credential.is_empty() {
            debug!(session = %session.id(), "No credential resolved");
            return PassOutcome::Blocked(Notice::CredentialMissing {
                env_vars: self.credentials.env_vars().to_vec(),
            });
        }

        let grounding = match self.context.grounding_context().await {
            Ok(text) => text,
            Err(err) => {
                warn!(session = %session.id(), error = %err, "Grounding context unavailable");
                return PassOutcome::Blocked(Notice::ContextUnavailable(err));
            }
        };

        if let Some(SessionEvent::Submit(text)) = event {
            if !text.trim().is_empty() {
                if session.is_generating() {
                    warn!(session = %session.id(), "Submission ignored: generation in flight");
                    return PassOutcome::Rejected;
                }
                debug!(session = %session.id(), chars = text.len(), "Captured submission");
                session.capture(text);
                return PassOutcome::Rerun;
            }
        }

        self.generate_pending(session, &credential, &grounding).await
    }

    /// Second half of a submission: commit, call the backend, commit, reset.
    async fn generate_pending(
        &self,
        session: &mut Session,
        credential: &Credential,
        grounding: &str,
    ) -> PassOutcome {
        let Some(pending) = session.start_generation() else {
            return PassOutcome::Settled;
        };

        let turns = session.turns();
        let history = &turns[..turns.len().saturating_sub(1)];
        let messages = self.assembler.build_messages(history, &pending, grounding);

        info!(
            session = %session.id(),
            history = history.len(),
            model = %self.model,
            "Generating reply"
        );

        let reply = match self.call_backend(credential, messages).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!(session = %session.id(), "Backend returned an empty reply");
                EMPTY_REPLY_FALLBACK.to_string()
            }
            Err(err) => {
                warn!(session = %session.id(), error = %err, "Backend call failed");
                format!("{BACKEND_ERROR_PREFIX}`{err}`")
            }
        };

        session.finish_generation(reply);
        PassOutcome::Rerun
    }

    async fn call_backend(
        &self,
        credential: &Credential,
        messages: Vec<Message>,
    ) -> Result<String, ProviderError> {
        let provider = self.factory.connect(credential)?;
        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = provider.complete(request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                provider = provider.name(),
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Backend usage"
            );
        }
        Ok(response.message.content)
    }
}
