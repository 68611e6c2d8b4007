use std::path::PathBuf;
use std::sync::Arc;

use action_flow::RetryingExecutor;
use action_locator::{FileRegistryStore, LocatorRegistry};
use action_primitives::SimulatedPage;
use action_recorder::ActionRecorder;
use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::cli::context::CliContext;
use crate::script::{execute_steps, Script};

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Page fixture (YAML) describing the simulated page
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// Step script to execute
    #[arg(long, value_name = "FILE")]
    pub script: PathBuf,

    /// Locator registry file (overrides `registry_path`)
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Recording output (overrides `recording_path`)
    #[arg(long, value_name = "FILE")]
    pub record: Option<PathBuf>,
}

pub async fn cmd_run(args: RunArgs, ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    let policy = config.retry_policy().context("Invalid retry configuration")?;

    let page = SimulatedPage::load_fixture(&args.page)
        .with_context(|| format!("Failed to load page fixture {}", args.page.display()))?;
    let script = Script::load(&args.script)
        .with_context(|| format!("Failed to load script {}", args.script.display()))?;
    let requests = script.requests()?;

    let store = args
        .registry
        .or_else(|| config.registry_path.clone())
        .map(FileRegistryStore::new);
    let registry = match &store {
        Some(store) => LocatorRegistry::load_from(store)
            .with_context(|| format!("Failed to load registry {}", store.path().display()))?,
        None => LocatorRegistry::new(),
    };
    let seeded = script.seed(&registry).await;

    info!(
        steps = requests.len(),
        seeded,
        max_attempts = policy.max_attempts,
        healing = config.healing_active(),
        "running script"
    );

    let recorder = ActionRecorder::new();
    let executor = RetryingExecutor::new(Arc::new(page), registry.clone(), recorder.clone())
        .with_healing(config.healing_active());

    let outcome = execute_steps(&executor, &requests, &policy).await;

    // Persist whatever was learned even when a step failed
    if let Some(store) = &store {
        registry
            .flush_to(store)
            .with_context(|| format!("Failed to save registry {}", store.path().display()))?;
    }
    if let Some(path) = args.record.or_else(|| config.recording_path.clone()) {
        recorder
            .write_json(&path)
            .with_context(|| format!("Failed to write recording {}", path.display()))?;
        info!(actions = recorder.len(), "Recording written to {}", path.display());
    }

    let reports = outcome?;
    let healed = reports.iter().filter(|r| r.healed.is_some()).count();
    println!(
        "{} steps completed ({} healed, {} actions recorded)",
        reports.len(),
        healed,
        recorder.len()
    );
    Ok(())
}
