//! `ragify status`: Show the effective configuration.

use std::path::Path;

use ragify_providers::default_base_url;

use super::CliResult;

pub async fn run(config_path: Option<&Path>) -> CliResult {
    let config = super::load_config(config_path)?;
    let path = super::config_path(config_path);
    let document = config.document_path();
    let resolver = config.credential_resolver();

    println!("Ragify Status");
    println!("=============");
    println!("  Config file:  {}", path.display());
    println!("  Provider:     {}", config.provider);
    println!(
        "  Endpoint:     {}",
        config
            .api_url
            .clone()
            .unwrap_or_else(|| default_base_url(&config.provider))
    );
    println!("  Model:        {}", config.model);
    println!("  Temperature:  {}", config.temperature);
    match config.max_tokens {
        Some(max) => println!("  Max tokens:   {max}"),
        None => println!("  Max tokens:   provider default"),
    }
    println!("  Timeout:      {}s", config.timeout_secs);
    println!(
        "  Document:     {} ({})",
        document.display(),
        if document.exists() { "found" } else { "missing" }
    );
    println!("  Key vars:     {}", resolver.env_vars().join(", "));
    println!(
        "  API key:      {}",
        if resolver.resolve(None).is_empty() {
            "not set"
        } else {
            "set"
        }
    );

    if !path.exists() {
        println!("\n  No config file; run `ragify onboard` to create one");
    }

    Ok(())
}
