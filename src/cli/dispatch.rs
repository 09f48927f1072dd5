use super::actions::cmd_actions;
use super::answers::cmd_answers;
use super::config::cmd_config;
use super::cv::cmd_cv;
use super::env::CliArgs;
use super::jobs::cmd_jobs;
use super::rehearse::cmd_rehearse;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Jobs(args) => cmd_jobs(args, ctx).await,
        Commands::Answers(args) => cmd_answers(args, ctx).await,
        Commands::Cv(args) => cmd_cv(args, ctx).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
        Commands::Actions(args) => cmd_actions(args, ctx).await,
        Commands::Rehearse(args) => cmd_rehearse(args, ctx).await,
    }
}
