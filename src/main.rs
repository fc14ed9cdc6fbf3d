//! Quantfolio CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use quantfolio_config::load_config_or_default;
use quantfolio_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(&cli.config).await;
    }

    let config = load_config_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    config.validate().context("Invalid configuration")?;

    // Setup logging
    let log_level = match cli.log_level {
        Some(level) => level.as_str(),
        None => config.logging.level.as_str(),
    };
    let _guard = setup_logging(
        log_level,
        cli.json_logs || config.logging.is_json(),
        config.logging.file.as_deref().map(Path::new),
    );

    // Execute command
    match cli.command {
        Commands::Load(args) => cli::commands::load::run(args, &config).await,
        Commands::Upload(args) => cli::commands::upload::run(args, &config).await,
        Commands::Fallback(args) => cli::commands::fallback::run(args, &config).await,
        Commands::Stats(args) => cli::commands::stats::run(args, &config).await,
        Commands::ValidateConfig => Ok(()),
    }
}
