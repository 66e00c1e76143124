//! Provider factory: builds the configured backend for a credential.
//!
//! The credential can change between passes (the user may paste a key after
//! startup), so providers are built on demand rather than cached.

use std::sync::Arc;
use std::time::Duration;

use ragify_config::AppConfig;
use ragify_core::error::ProviderError;
use ragify_core::provider::{Provider, ProviderFactory};
use ragify_core::Credential;
use tracing::debug;

use crate::openai_compat::{GEMINI_BASE_URL, OpenAiCompatProvider};

/// Builds OpenAI-compatible providers from configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredProviderFactory {
    name: String,
    base_url: String,
    timeout: Duration,
}

impl ConfiguredProviderFactory {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Build a factory from the loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let base_url = config
            .api_url
            .clone()
            .unwrap_or_else(|| default_base_url(&config.provider));
        Self::new(
            &config.provider,
            base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn provider_name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ProviderFactory for ConfiguredProviderFactory {
    fn connect(&self, credential: &Credential) -> Result<Arc<dyn Provider>, ProviderError> {
        if credential.is_empty() {
            return Err(ProviderError::NotConfigured(format!(
                "No API key for provider '{}'",
                self.name
            )));
        }

        debug!(provider = %self.name, base_url = %self.base_url, "Building provider");
        let provider = OpenAiCompatProvider::new(
            &self.name,
            &self.base_url,
            credential.expose(),
            self.timeout,
        )?;
        Ok(Arc::new(provider))
    }
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "gemini" | "google" => GEMINI_BASE_URL.into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
