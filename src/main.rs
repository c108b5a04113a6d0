//! Product search CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use product_search::cli::{commands, handle_error, Cli, Commands};
use product_search::infrastructure::config::ConfigLoader;
use product_search::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json_mode);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let log_config = LogConfig::try_from(&config.logging)?;
    // Keeps the file writer flushing until the command returns.
    let _logger = LoggerImpl::init(&log_config).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, &config).await,
        Commands::Seed(args) => commands::seed::execute(args, &config, cli.json).await,
        Commands::Search(args) => commands::search::execute(args, &config, cli.json).await,
    }
}
