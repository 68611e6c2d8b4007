use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tokio::fs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

pub struct LoadedConfig {
    pub config: Config,

    /// `None` when no file was found and defaults were used
    pub path: Option<PathBuf>,
}

/// Resolve, read and parse the configuration, then apply env overrides
pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let candidate = match config_path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        }
        None => default_config_path(),
    };

    let mut config = match &candidate {
        Some(path) => {
            let content = fs::read_to_string(path)
                .await
                .context("Failed to read config file")?;
            Config::from_yaml(&content).context("Failed to parse config file")?
        }
        None => Config::default(),
    };

    config
        .apply_env_overrides()
        .context("Invalid environment override")?;

    Ok(LoadedConfig {
        config,
        path: candidate,
    })
}

fn default_config_path() -> Option<PathBuf> {
    // Priority: ./config/webheal.yaml > ~/.config/webheal/config.yaml
    let local_config = PathBuf::from("config/webheal.yaml");
    if local_config.exists() {
        return Some(local_config);
    }

    let mut path = dirs::config_dir()?;
    path.push("webheal");
    path.push("config.yaml");
    path.exists().then_some(path)
}
