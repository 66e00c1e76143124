//! End-to-end integration tests for the Ragify chat pipeline.
//!
//! These tests drive full chat cycles through the public API: config
//! loading, grounding document extraction, prompt assembly, the scripted
//! backend, and the pass loop a front end runs.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use ragify_agent::{
    BACKEND_ERROR_PREFIX, ContextStore, EMPTY_REPLY_FALLBACK, Notice, PassOutcome, Session,
    SessionEvent, TurnOrchestrator,
};
use ragify_config::{AppConfig, CredentialResolver};
use ragify_core::error::{ContextError, ProviderError};
use ragify_core::message::{Message, Role, Speaker};
use ragify_core::provider::{Provider, ProviderFactory, ProviderRequest, ProviderResponse, Usage};
use ragify_core::Credential;
use ragify_providers::ConfiguredProviderFactory;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted results in sequence.
struct ScriptedProvider {
    results: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    seen: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(results: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            results: Mutex::new(results),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn last_request(&self) -> ProviderRequest {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut seen = self.seen.lock().unwrap();
        let results = self.results.lock().unwrap();
        let call = seen.len();
        if call >= results.len() {
            panic!(
                "ScriptedProvider exhausted: call #{call}, have {}",
                results.len()
            );
        }
        seen.push(request);
        results[call].clone()
    }
}

/// Records the credential each connection was made with.
struct RecordingFactory {
    provider: Arc<ScriptedProvider>,
    keys: Mutex<Vec<String>>,
}

impl ProviderFactory for RecordingFactory {
    fn connect(&self, credential: &Credential) -> Result<Arc<dyn Provider>, ProviderError> {
        self.keys.lock().unwrap().push(credential.expose().to_string());
        Ok(self.provider.clone())
    }
}

fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 120,
            completion_tokens: 40,
            total_tokens: 160,
        }),
        model: "gemini-2.5-flash".into(),
    }
}

// ── Fixture ──────────────────────────────────────────────────────────────

const KNOWLEDGE_BASE: &str = "Sparse retrievers\nBM25 ranks documents by term frequency.\x0c\
Dense retrievers\nDPR encodes queries and passages into vectors.\x0c\
Hybrid retrieval\nCombine BM25 and dense scores.";

struct Harness {
    provider: Arc<ScriptedProvider>,
    factory: Arc<RecordingFactory>,
    orchestrator: TurnOrchestrator,
    _tmp: tempfile::TempDir,
}

impl Harness {
    fn new(results: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("RAG_Complete_Knowledge_Base.txt");
        std::fs::write(&path, KNOWLEDGE_BASE).unwrap();

        let provider = Arc::new(ScriptedProvider::new(results));
        let factory = Arc::new(RecordingFactory {
            provider: provider.clone(),
            keys: Mutex::new(Vec::new()),
        });
        let orchestrator = TurnOrchestrator::new(
            factory.clone(),
            Arc::new(ContextStore::plain_text(path)),
            CredentialResolver::new(vec!["RAGIFY_E2E_UNSET_KEY".into()]),
        );

        Self {
            provider,
            factory,
            orchestrator,
            _tmp: tmp,
        }
    }

    /// Run passes the way the terminal does, counting them.
    async fn settle(
        &self,
        session: &mut Session,
        key: Option<&str>,
        event: Option<SessionEvent>,
    ) -> (PassOutcome, usize) {
        let mut event = event;
        let mut passes = 0;
        loop {
            passes += 1;
            let outcome = self.orchestrator.run_pass(session, key, event.take()).await;
            if !outcome.wants_rerun() {
                return (outcome, passes);
            }
        }
    }
}

fn submit(text: &str) -> Option<SessionEvent> {
    Some(SessionEvent::Submit(text.into()))
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_question_completes_a_full_cycle() {
    let h = Harness::new(vec![Ok(text_response(
        "Recommended Retriever: BM25\nReason:\nKeyword-heavy queries over short documents.",
    ))]);
    let mut session = Session::new();

    let (outcome, passes) = h.settle(&mut session, Some("AIza-test"), submit("What is BM25?")).await;

    assert_eq!(outcome, PassOutcome::Settled);
    assert_eq!(passes, 3, "capture, generate, then an idle pass");
    assert_eq!(session.turns().len(), 2);
    assert_eq!(session.turns()[0].content(), "What is BM25?");
    assert_eq!(session.turns()[1].speaker(), Speaker::Assistant);
    assert!(session.turns()[1].content().starts_with("Recommended Retriever: BM25"));
    assert!(!session.is_generating());
    assert_eq!(h.provider.calls(), 1);
}

#[tokio::test]
async fn request_carries_instructions_grounding_and_history() {
    let h = Harness::new(vec![
        Ok(text_response("BM25 is sparse.")),
        Ok(text_response("DPR is dense.")),
    ]);
    let mut session = Session::new();

    h.settle(&mut session, Some("AIza-test"), submit("What is BM25?")).await;
    h.settle(&mut session, Some("AIza-test"), submit("And DPR?")).await;

    let request = h.provider.last_request();
    assert_eq!(request.model, "gemini-2.5-flash");
    assert_eq!(request.messages.len(), 2 + 3);

    assert_eq!(request.messages[0].role, Role::System);
    assert!(request.messages[0].content.contains("RAG & Retriever Expert"));

    let grounding = &request.messages[1].content;
    assert_eq!(request.messages[1].role, Role::System);
    assert!(grounding.contains("RAG_Complete_Knowledge_Base.txt"));
    assert!(grounding.contains("BM25 ranks documents by term frequency."));
    assert!(grounding.contains(
        "BM25 ranks documents by term frequency.\n\nDense retrievers"
    ));

    assert_eq!(request.messages[2], Message::user("What is BM25?"));
    assert_eq!(request.messages[3], Message::assistant("BM25 is sparse."));
    assert_eq!(request.messages[4], Message::user("And DPR?"));
}

#[tokio::test]
async fn backend_failure_is_shown_as_a_reply() {
    let h = Harness::new(vec![
        Err(ProviderError::ApiError {
            status_code: 429,
            message: "quota exceeded".into(),
        }),
        Ok(text_response("Back online.")),
    ]);
    let mut session = Session::new();

    h.settle(&mut session, Some("AIza-test"), submit("Compare retrievers")).await;
    let reply = session.turns()[1].content().to_string();
    assert!(reply.starts_with(BACKEND_ERROR_PREFIX));
    assert!(reply.contains("quota exceeded"));
    assert!(!session.is_generating());

    // The session keeps working after a failure.
    h.settle(&mut session, Some("AIza-test"), submit("Try again")).await;
    assert_eq!(session.turns().len(), 4);
    assert_eq!(session.turns()[3].content(), "Back online.");
}

#[tokio::test]
async fn empty_reply_uses_the_fallback() {
    let h = Harness::new(vec![Ok(text_response(""))]);
    let mut session = Session::new();

    h.settle(&mut session, Some("AIza-test"), submit("hello")).await;

    assert_eq!(session.turns()[1].content(), EMPTY_REPLY_FALLBACK);
}

#[tokio::test]
async fn missing_credential_blocks_until_a_key_is_given() {
    let h = Harness::new(vec![Ok(text_response("answer"))]);
    let mut session = Session::new();

    let (outcome, _) = h.settle(&mut session, None, submit("What is BM25?")).await;
    assert!(matches!(
        outcome,
        PassOutcome::Blocked(Notice::CredentialMissing { .. })
    ));
    assert!(session.turns().is_empty());
    assert!(!session.is_generating());
    assert_eq!(h.provider.calls(), 0);

    // The blocked submission was dropped; the user resubmits after /key.
    let (outcome, _) = h
        .settle(&mut session, Some("  AIza-late  "), submit("What is BM25?"))
        .await;
    assert_eq!(outcome, PassOutcome::Settled);
    assert_eq!(session.turns().len(), 2);
    assert_eq!(h.factory.keys.lock().unwrap().as_slice(), ["AIza-late"]);
}

#[tokio::test]
async fn clear_resets_a_long_conversation() {
    let replies = (0..5).map(|i| Ok(text_response(&format!("answer {i}")))).collect();
    let h = Harness::new(replies);
    let mut session = Session::new();

    for i in 0..5 {
        h.settle(&mut session, Some("AIza-test"), submit(&format!("question {i}")))
            .await;
    }
    assert_eq!(session.turns().len(), 10);

    let (outcome, _) = h
        .settle(&mut session, Some("AIza-test"), Some(SessionEvent::Clear))
        .await;
    assert_eq!(outcome, PassOutcome::Settled);
    assert!(session.turns().is_empty());
    assert!(!session.is_generating());
}

#[tokio::test]
async fn missing_document_blocks_the_chat() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let factory = Arc::new(RecordingFactory {
        provider: provider.clone(),
        keys: Mutex::new(Vec::new()),
    });
    let orchestrator = TurnOrchestrator::new(
        factory,
        Arc::new(ContextStore::plain_text("/nonexistent/RAG_Complete_Knowledge_Base.txt")),
        CredentialResolver::new(vec!["RAGIFY_E2E_UNSET_KEY".into()]),
    );
    let mut session = Session::new();

    let outcome = orchestrator
        .run_pass(&mut session, Some("AIza-test"), submit("hello"))
        .await;

    match outcome {
        PassOutcome::Blocked(Notice::ContextUnavailable(ContextError::Missing { path })) => {
            assert_eq!(
                path,
                PathBuf::from("/nonexistent/RAG_Complete_Knowledge_Base.txt")
            );
        }
        other => panic!("Expected a missing document notice, got: {other:?}"),
    }
    assert!(session.turns().is_empty());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn sessions_are_independent() {
    let h = Harness::new(vec![Ok(text_response("one")), Ok(text_response("two"))]);
    let mut alice = Session::new();
    let mut bob = Session::new();

    h.settle(&mut alice, Some("AIza-test"), submit("first")).await;
    h.settle(&mut bob, Some("AIza-test"), submit("second")).await;

    assert_ne!(alice.id(), bob.id());
    assert_eq!(alice.turns().len(), 2);
    assert_eq!(bob.turns().len(), 2);
    // Bob's request carries none of Alice's history.
    assert_eq!(h.provider.last_request().messages.len(), 3);
}

// ── Config wiring ────────────────────────────────────────────────────────

#[test]
fn config_file_drives_the_factory() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
provider = "openai"
model = "gpt-4o-mini"
temperature = 0.5
api_url = "http://localhost:9999/v1"

[knowledge]
document = "/srv/kb/notes.txt"
"#,
    )
    .unwrap();

    let config = AppConfig::load_from(&path).unwrap();
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.document_path(), PathBuf::from("/srv/kb/notes.txt"));

    let factory = ConfiguredProviderFactory::from_config(&config);
    assert_eq!(factory.provider_name(), "openai");
    assert_eq!(factory.base_url(), "http://localhost:9999/v1");
}

#[tokio::test]
async fn orchestrator_from_config_uses_configured_model() {
    let tmp = tempfile::tempdir().unwrap();
    let doc = tmp.path().join("kb.txt");
    std::fs::write(&doc, KNOWLEDGE_BASE).unwrap();

    let config = AppConfig {
        model: "gemini-2.5-pro".into(),
        temperature: 0.7,
        max_tokens: Some(512),
        ..AppConfig::default()
    };

    let provider = Arc::new(ScriptedProvider::new(vec![Ok(text_response("ok"))]));
    let factory = Arc::new(RecordingFactory {
        provider: provider.clone(),
        keys: Mutex::new(Vec::new()),
    });
    let orchestrator =
        TurnOrchestrator::from_config(&config, factory, Arc::new(ContextStore::plain_text(&doc)));
    assert_eq!(orchestrator.model(), "gemini-2.5-pro");

    let mut session = Session::new();
    let mut event = submit("hi");
    while orchestrator
        .run_pass(&mut session, Some("AIza-test"), event.take())
        .await
        .wants_rerun()
    {}

    let request = provider.last_request();
    assert_eq!(request.model, "gemini-2.5-pro");
    assert!((request.temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(request.max_tokens, Some(512));
}

#[test]
fn configured_factory_refuses_an_empty_credential() {
    let factory = ConfiguredProviderFactory::from_config(&AppConfig::default());
    let err = factory.connect(&Credential::empty()).err().unwrap();
    assert!(matches!(err, ProviderError::NotConfigured(_)));
}
