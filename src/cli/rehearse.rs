use std::path::PathBuf;
use std::sync::Arc;

use action_primitives::{Scenario, ScriptedPage};
use anyhow::{Context, Result};
use clap::Args;
use jobpilot::ActionResult;
use jobpilot_core_types::JobRecord;
use jobpilot_outcome_store::{InMemoryOutcomeStore, OutcomeRecorder};
use serde::Serialize;
use tracing::info;

use super::context::CliContext;
use super::output::emit;

#[derive(Args, Clone, Debug)]
pub struct RehearseArgs {
    /// Scenario file (YAML) describing the page stages
    pub scenario: PathBuf,

    /// Keep the outcome in memory instead of appending it to the store
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct Rehearsal {
    url: String,
    detection: ActionResult,
    application: ActionResult,
    clicks: Vec<String>,
    final_stage: String,
    records: Vec<JobRecord>,
}

pub async fn cmd_rehearse(args: RehearseArgs, ctx: &CliContext) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.scenario)
        .await
        .with_context(|| format!("Failed to read scenario {}", args.scenario.display()))?;
    let scenario: Scenario = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse scenario {}", args.scenario.display()))?;
    let url = scenario.url.clone();
    let page = ScriptedPage::new(scenario).context("Invalid scenario")?;

    let store: Arc<dyn OutcomeRecorder> = if args.dry_run {
        Arc::new(InMemoryOutcomeStore::new())
    } else {
        ctx.store()
    };
    let actions = ctx.actions_with(store.clone());

    info!(%url, dry_run = args.dry_run, "Rehearsing Easy Apply");
    let detection = actions.check_easy_apply(&page).await;
    let application = actions.apply_to_job(&page).await;

    let rehearsal = Rehearsal {
        records: store.find_by_link(&url).await?,
        url,
        detection,
        application,
        clicks: page.clicks(),
        final_stage: page.current_stage(),
    };

    emit(ctx.output(), &rehearsal, |r| {
        println!("Scenario:    {}", r.url);
        println!("Detection:   {}", describe(&r.detection));
        println!("Application: {}", describe(&r.application));
        println!("Clicks:      {}", r.clicks.join(" -> "));
        println!("Final stage: {}", r.final_stage);
        if let Some(record) = r.records.last() {
            println!(
                "Recorded:    {} (fit {:.1}) for {} at {}",
                record.status, record.fit_score, record.title, record.company
            );
        }
    })
}

fn describe(result: &ActionResult) -> String {
    match &result.error {
        Some(error) => format!("error: {error}"),
        None => result.content().to_string(),
    }
}
