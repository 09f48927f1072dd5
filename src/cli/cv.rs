use anyhow::{Context, Result};
use clap::Args;
use jobpilot::CvDocument;

use super::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct CvArgs {
    /// Print only the resolved CV path
    #[arg(long)]
    pub path: bool,
}

pub async fn cmd_cv(args: CvArgs, ctx: &CliContext) -> Result<()> {
    let cv = CvDocument::new(&ctx.config().cv_path);
    if args.path {
        println!("{}", cv.path().display());
        return Ok(());
    }

    let text = cv.extract_text().await.context("Failed to read CV")?;
    println!("{text}");
    Ok(())
}
