use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use jobpilot::AppConfig;
use tokio::fs;
use tracing::info;

use crate::cli::context::CliContext;
use crate::cli::output::emit;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration (file, defaults and environment)
    Show,

    /// Print the configuration file location
    Path,

    /// Write a default configuration file if none exists
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate the configuration file
    Validate,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    let path = ctx.config_path().to_path_buf();
    match args.action {
        ConfigAction::Show => {
            emit(ctx.output(), ctx.config(), |config| {
                let source = if ctx.config_found() {
                    path.display().to_string()
                } else {
                    "defaults".to_string()
                };
                println!("Current configuration ({source}):");
                match serde_yaml::to_string(config) {
                    Ok(yaml) => print!("{yaml}"),
                    Err(err) => println!("<unprintable: {err}>"),
                }
            })?;
        }
        ConfigAction::Path => {
            let state = if ctx.config_found() { "" } else { " (not present)" };
            println!("{}{state}", path.display());
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists; pass --force to overwrite", path.display());
            }
            save_config_file(&path, &AppConfig::default()).await?;
            info!("Wrote default configuration to {}", path.display());
            println!("Configuration written to {}", path.display());
        }
        ConfigAction::Validate => {
            if !path.exists() {
                bail!("No configuration file at {}", path.display());
            }
            AppConfig::from_file(&path)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?;
            println!("Configuration is valid: {}", path.display());
        }
    }
    Ok(())
}

async fn save_config_file(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let yaml = serde_yaml::to_string(config)?;
    fs::write(path, yaml)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
