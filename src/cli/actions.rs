use anyhow::{bail, Result};
use clap::Args;
use jobpilot::catalog;

use super::context::CliContext;
use super::output::emit;

#[derive(Args, Clone, Debug)]
pub struct ActionsArgs {
    /// Show a single action
    #[arg(long)]
    pub name: Option<String>,
}

pub async fn cmd_actions(args: ActionsArgs, ctx: &CliContext) -> Result<()> {
    let mut specs = catalog();
    if let Some(name) = &args.name {
        specs.retain(|spec| spec.name == name.as_str());
        if specs.is_empty() {
            bail!("Unknown action '{name}'");
        }
    }

    emit(ctx.output(), &specs, |specs| {
        for spec in specs {
            let browser = if spec.requires_browser { "page" } else { "    " };
            println!("{:<18} {} {}", spec.name, browser, spec.description);
        }
    })
}
