use std::path::PathBuf;

use action_locator::{FileRegistryStore, LocatorRegistry};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use tracing::info;
use webheal_core_types::{Selector, Target};

use crate::cli::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct LocatorsArgs {
    /// Locator registry file (overrides `registry_path`)
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub action: LocatorsAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum LocatorsAction {
    /// List every target and its current selector
    List,

    /// Show the selector for one target
    Get {
        /// Target name
        target: String,
    },

    /// Set the selector for a target
    Set {
        /// Target name
        target: String,

        /// Selector expression
        selector: String,
    },

    /// Remove a target
    Remove {
        /// Target name
        target: String,
    },
}

pub async fn cmd_locators(args: LocatorsArgs, ctx: &CliContext) -> Result<()> {
    let path = args
        .registry
        .or_else(|| ctx.config().registry_path.clone())
        .ok_or_else(|| anyhow!("No registry file: pass --registry or set registry_path"))?;
    let store = FileRegistryStore::new(path);
    let registry = LocatorRegistry::load_from(&store)
        .with_context(|| format!("Failed to load registry {}", store.path().display()))?;

    match args.action {
        LocatorsAction::List => {
            for (target, selector) in registry.snapshot() {
                println!("{}\t{}", target, selector);
            }
        }
        LocatorsAction::Get { target } => {
            let target = Target::new(target)?;
            match registry.get(&target) {
                Some(selector) => println!("{}", selector),
                None => return Err(anyhow!("Target '{}' is not registered", target)),
            }
        }
        LocatorsAction::Set { target, selector } => {
            let target = Target::new(target)?;
            registry.set(&target, Selector::new(selector)).await;
            registry.flush_to(&store)?;
            info!(target = %target, "Locator updated");
        }
        LocatorsAction::Remove { target } => {
            let target = Target::new(target)?;
            if registry.remove(&target).await.is_none() {
                return Err(anyhow!("Target '{}' is not registered", target));
            }
            registry.flush_to(&store)?;
            info!(target = %target, "Locator removed");
        }
    }

    Ok(())
}
