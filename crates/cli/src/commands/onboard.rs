//! `ragify onboard`: First-time setup.

use std::path::Path;

use ragify_config::AppConfig;

use super::CliResult;

pub async fn run(config_path: Option<&Path>) -> CliResult {
    let config_path = super::config_path(config_path);

    println!("Ragify First-Time Setup");
    println!("=======================\n");

    if let Some(dir) = config_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("  Created config directory: {}", dir.display());
        }
    }

    if config_path.exists() {
        println!("  Config already exists at: {}", config_path.display());
        println!("  Edit it manually or delete it and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("  Created config at: {}", config_path.display());

    let config = AppConfig::load_from(&config_path)?;
    let env_vars = config.credential_resolver().env_vars().join(" or ");
    println!("\n  Next steps:");
    println!(
        "   1. Put the knowledge base next to the binary as {}",
        config.knowledge.document.display()
    );
    println!("      (or set [knowledge] document in the config)");
    println!("   2. Export {env_vars}, or use /key inside the chat");
    println!("   3. Run: ragify chat\n");

    Ok(())
}
