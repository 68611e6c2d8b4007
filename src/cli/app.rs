use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{init_logging, load_config, LoadedConfig};

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();

    let LoadedConfig { config, path } = load_config(cli.config.as_ref()).await?;
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level, cli.debug)?;

    info!("Starting webheal v{}", env!("CARGO_PKG_VERSION"));
    match &path {
        Some(path) => info!("Loaded configuration from: {}", path.display()),
        None => warn!("Config file not found, using defaults"),
    }

    let cli_context = CliContext::new(config, path);

    match dispatch(&cli, &cli_context).await {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {:#}", err);
            Err(err)
        }
    }
}
