//! Configuration loading, validation, and management for Ragify.
//!
//! Loads configuration from `~/.ragify/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! The API key is deliberately *not* part of the file format: it comes from
//! the interactive session or the environment, see [`CredentialResolver`].

pub mod credential;

pub use credential::CredentialResolver;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.ragify/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend provider ("gemini", "openai", "openrouter", "ollama", ...)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature; kept low for a stable answer template
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Optional cap on reply length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// HTTP timeout for a single generation request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Grounding document settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Where credentials are looked up
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Grounding document. Relative paths resolve against the directory of
    /// the running executable.
    #[serde(default = "default_document")]
    pub document: PathBuf,
}

fn default_document() -> PathBuf {
    PathBuf::from("RAG_Complete_Knowledge_Base.pdf")
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            document: default_document(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Environment variables checked, in order, when no key is typed in.
    #[serde(default = "default_env_vars")]
    pub env_vars: Vec<String>,
}

fn default_env_vars() -> Vec<String> {
    vec!["GOOGLE_API_KEY".into(), "GEMINI_API_KEY".into()]
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            env_vars: default_env_vars(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.ragify/config.toml).
    ///
    /// Environment overrides:
    /// - `RAGIFY_PROVIDER`
    /// - `RAGIFY_MODEL`
    /// - `RAGIFY_DOCUMENT`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_overrides(&Self::config_dir().join("config.toml"))
    }

    /// Load from a specific file, then apply environment overrides.
    pub fn load_with_overrides(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(provider) = non_empty("RAGIFY_PROVIDER") {
            self.provider = provider;
        }
        if let Some(model) = non_empty("RAGIFY_MODEL") {
            self.model = model;
        }
        if let Some(document) = non_empty("RAGIFY_DOCUMENT") {
            self.knowledge.document = PathBuf::from(document);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".ragify")
    }

    /// The grounding document path, resolved against the executable's
    /// directory when relative.
    pub fn document_path(&self) -> PathBuf {
        let base = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default();
        resolve_relative(&self.knowledge.document, &base)
    }

    /// A resolver for the configured credential environment variables.
    pub fn credential_resolver(&self) -> CredentialResolver {
        CredentialResolver::new(self.credentials.env_vars.clone())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if self.credentials.env_vars.is_empty() {
            return Err(ConfigError::ValidationError(
                "credentials.env_vars must name at least one variable".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            api_url: None,
            timeout_secs: default_timeout_secs(),
            knowledge: KnowledgeConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

fn resolve_relative(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for ragify_core::Error {
    fn from(err: ConfigError) -> Self {
        ragify_core::Error::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(
            config.knowledge.document,
            PathBuf::from("RAG_Complete_Knowledge_Base.pdf")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.credentials.env_vars, config.credentials.env_vars);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_env_var_list_rejected() {
        let mut config = AppConfig::default();
        config.credentials.env_vars.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.provider, "gemini");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
model = "gemini-2.0-flash"
max_tokens = 2048

[knowledge]
document = "/srv/kb/rag.txt"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_tokens, Some(2048));
        assert_eq!(config.knowledge.document, PathBuf::from("/srv/kb/rag.txt"));
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "temperature = \"warm\"").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn env_overrides_apply_and_skip_blank_values() {
        let vars: HashMap<&str, &str> = [
            ("RAGIFY_MODEL", "gemini-2.5-pro"),
            ("RAGIFY_PROVIDER", "  "),
            ("RAGIFY_DOCUMENT", "/data/kb.txt"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.knowledge.document, PathBuf::from("/data/kb.txt"));
    }

    #[test]
    fn relative_document_resolves_against_base() {
        let base = Path::new("/opt/ragify/bin");
        assert_eq!(
            resolve_relative(Path::new("kb.txt"), base),
            PathBuf::from("/opt/ragify/bin/kb.txt")
        );
        assert_eq!(
            resolve_relative(Path::new("/etc/kb.txt"), base),
            PathBuf::from("/etc/kb.txt")
        );
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gemini-2.5-flash"));
        assert!(toml_str.contains("GOOGLE_API_KEY"));
        assert!(toml_str.contains("[knowledge]"));
    }

    #[test]
    fn malformed_file_surfaces_as_config_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "temperature = \"warm\"").unwrap();

        let err: ragify_core::Error = AppConfig::load_from(&path).unwrap_err().into();
        assert!(matches!(err, ragify_core::Error::Config { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
