//! Ragify CLI: the main entry point.
//!
//! Commands:
//! - `chat`: Interactive grounded chat
//! - `ask`: Answer a single question and exit
//! - `doctor`: Check credential, document and backend
//! - `status`: Show the effective configuration
//! - `onboard`: Write a starter config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod terminal;

#[derive(Parser)]
#[command(
    name = "ragify",
    about = "Ragify, a RAG & Retriever Chatbot",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.ragify/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat interactively, grounded in the knowledge base
    Chat {
        /// Gemini API key for this session (takes precedence over the environment).
        /// Visible in shell history; prefer `/key` inside the chat, which
        /// prompts without echo.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Ask one question and print the answer
    Ask {
        /// The question
        #[arg(short, long)]
        message: String,

        /// Gemini API key for this run. Visible in shell history; prefer the
        /// environment variables.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Diagnose setup problems
    Doctor,

    /// Show the effective configuration
    Status,

    /// Write a default config file
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Chat { api_key } => commands::chat::run(config_path, api_key).await?,
        Commands::Ask { message, api_key } => {
            commands::ask::run(config_path, &message, api_key).await?
        }
        Commands::Doctor => commands::doctor::run(config_path).await?,
        Commands::Status => commands::status::run(config_path).await?,
        Commands::Onboard => commands::onboard::run(config_path).await?,
    }

    Ok(())
}
