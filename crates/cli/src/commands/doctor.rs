//! `ragify doctor`: Diagnose setup problems.

use std::path::Path;

use ragify_agent::ContextStore;
use ragify_config::AppConfig;
use ragify_core::ProviderFactory;
use ragify_providers::ConfiguredProviderFactory;

use super::CliResult;

pub async fn run(config_path: Option<&Path>) -> CliResult {
    println!("Ragify Doctor");
    println!("=============\n");

    let mut issues = 0;

    let path = super::config_path(config_path);
    let config = match AppConfig::load_with_overrides(&path) {
        Ok(config) => {
            if path.exists() {
                println!("  [ok]   Config file valid ({})", path.display());
            } else {
                println!("  [info] No config file, using defaults. Run `ragify onboard` to create one");
            }
            config
        }
        Err(e) => {
            println!("  [fail] Config file invalid: {e}");
            println!("\n  1 issue found. Fix the config file and re-run.");
            return Ok(());
        }
    };

    let store = ContextStore::for_path(config.document_path());
    match store.grounding_context().await {
        Ok(text) => println!(
            "  [ok]   Knowledge base loaded: {} ({} chars)",
            store.path().display(),
            text.len()
        ),
        Err(e) => {
            println!("  [fail] {e}");
            issues += 1;
        }
    }

    let resolver = config.credential_resolver();
    let credential = resolver.resolve(None);
    if credential.is_empty() {
        println!(
            "  [warn] No API key in the environment. Set {} or pass --api-key",
            resolver.env_vars().join(" or ")
        );
        issues += 1;
    } else {
        println!("  [ok]   API key found in the environment");

        let factory = ConfiguredProviderFactory::from_config(&config);
        let reachable = match factory.connect(&credential) {
            Ok(provider) => provider.health_check().await,
            Err(e) => Err(e),
        };
        match reachable {
            Ok(true) => println!("  [ok]   Backend reachable at {}", factory.base_url()),
            Ok(false) => {
                println!("  [warn] Backend at {} did not report healthy", factory.base_url());
                issues += 1;
            }
            Err(e) => {
                println!("  [fail] Backend check failed: {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
