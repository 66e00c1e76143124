pub mod ask;
pub mod chat;
pub mod doctor;
pub mod onboard;
pub mod status;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ragify_agent::{ContextStore, TurnOrchestrator};
use ragify_config::AppConfig;
use ragify_providers::ConfiguredProviderFactory;

pub type CliResult = ragify_core::Result<()>;

/// The config file in effect: `--config` or the default location.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

pub fn load_config(explicit: Option<&Path>) -> ragify_core::Result<AppConfig> {
    let path = config_path(explicit);
    Ok(AppConfig::load_with_overrides(&path)?)
}

/// Wire the orchestrator for this process. The context store is created
/// here, once, and shared by every pass.
pub fn build_orchestrator(config: &AppConfig) -> TurnOrchestrator {
    let context = Arc::new(ContextStore::for_path(config.document_path()));
    let factory = Arc::new(ConfiguredProviderFactory::from_config(config));
    TurnOrchestrator::from_config(config, factory, context)
}
