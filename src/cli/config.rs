use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            match ctx.config_path() {
                Some(path) => println!("# Current configuration ({}):", path.display()),
                None => println!("# Current configuration (defaults):"),
            }
            println!("{}", serde_yaml::to_string(ctx.config())?);
            println!("# healing active: {}", ctx.config().healing_active());
        }
    }
    Ok(())
}
