//! Shared test helpers for orchestrator tests.

use std::sync::{Arc, Mutex};

use ragify_config::CredentialResolver;
use ragify_core::error::ProviderError;
use ragify_core::message::Message;
use ragify_core::provider::{
    Provider, ProviderFactory, ProviderRequest, ProviderResponse, Usage,
};
use ragify_core::Credential;

use crate::context::ContextStore;
use crate::orchestrator::TurnOrchestrator;

pub const GROUNDING_TEXT: &str = "BM25 is a sparse retriever. Dense retrievers use embeddings.";

/// A provider that returns a sequence of scripted results and records every
/// request it receives.
///
/// Panics if more calls are made than results provided.
pub struct ScriptedProvider {
    results: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(results: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            results: Mutex::new(results),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let results = self.results.lock().unwrap();
        let index = requests.len();
        if index >= results.len() {
            panic!(
                "ScriptedProvider: no more results (call #{index}, have {})",
                results.len()
            );
        }
        requests.push(request);
        results[index].clone()
    }
}

/// Hands out the same scripted provider for any non-empty credential.
pub struct ScriptedFactory(pub Arc<ScriptedProvider>);

impl ProviderFactory for ScriptedFactory {
    fn connect(&self, credential: &Credential) -> Result<Arc<dyn Provider>, ProviderError> {
        assert!(!credential.is_empty(), "connect called without a credential");
        Ok(self.0.clone())
    }
}

pub struct FailingFactory;

impl ProviderFactory for FailingFactory {
    fn connect(&self, _credential: &Credential) -> Result<Arc<dyn Provider>, ProviderError> {
        Err(ProviderError::NotConfigured("unsupported provider 'nope'".into()))
    }
}

pub fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "test-model".into(),
    }
}

/// A resolver whose environment variables are never set, so only the
/// user-supplied key counts.
pub fn unset_resolver() -> CredentialResolver {
    CredentialResolver::new(vec!["RAGIFY_TEST_UNSET_KEY".into()])
}

/// A knowledge base file on disk plus a scripted backend.
pub struct Fixture {
    pub provider: Arc<ScriptedProvider>,
    pub context: Arc<ContextStore>,
    _tmp: tempfile::TempDir,
}

impl Fixture {
    pub fn new(results: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("RAG_Complete_Knowledge_Base.txt");
        std::fs::write(&path, GROUNDING_TEXT).unwrap();
        Self {
            provider: Arc::new(ScriptedProvider::new(results)),
            context: Arc::new(ContextStore::plain_text(path)),
            _tmp: tmp,
        }
    }

    pub fn factory(&self) -> Arc<dyn ProviderFactory> {
        Arc::new(ScriptedFactory(self.provider.clone()))
    }

    pub fn orchestrator(&self) -> TurnOrchestrator {
        TurnOrchestrator::new(self.factory(), self.context.clone(), unset_resolver())
            .with_model("test-model")
    }
}
