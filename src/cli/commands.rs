use clap::Subcommand;

use super::config::ConfigArgs;
use super::locators::LocatorsArgs;
use super::run::RunArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Run a step script against a simulated page
    Run(RunArgs),

    /// Inspect or edit a file-backed locator registry
    Locators(LocatorsArgs),

    /// Configuration management
    Config(ConfigArgs),
}
