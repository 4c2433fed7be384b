//! Localfind CLI
//!
//! Main entry point for the localfind command-line tool.
//! Finds local businesses through grounded generative search and renders
//! them as a fixed twelve-column table.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ModelsCommand, SearchCommand};
use localfind_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Localfind CLI - grounded local-business search
#[derive(Parser, Debug)]
#[command(name = "localfind")]
#[command(about = "Find local businesses with grounded generative search", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "LOCALFIND_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Generative provider (gemini)
    #[arg(short, long, global = true, env = "LOCALFIND_PROVIDER")]
    provider: Option<String>,

    /// API key for the provider
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for local businesses
    Search(SearchCommand),

    /// Show the configured model catalog
    Models(ModelsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from the config file and environment
    let config = AppConfig::load_with_file(cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.provider,
        cli.api_key,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Localfind CLI starting");
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!(
        "Models: fast={}, deep={}",
        config.models.fast,
        config.models.deep
    );

    let command_name = match &cli.command {
        Commands::Search(_) => "search",
        Commands::Models(_) => "models",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Search(cmd) => cmd.execute(&config).await,
        Commands::Models(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
