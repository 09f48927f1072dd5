use anyhow::{bail, Result};
use clap::{Args, Subcommand, ValueEnum};
use jobpilot_core_types::{ApplicationStatus, JobPosting, JobRecord};

use super::context::CliContext;
use super::output::emit;

#[derive(Args, Clone, Debug)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub action: JobsAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum JobsAction {
    /// List every saved job and application outcome
    List {
        /// Only show records with this status
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,
    },

    /// Save a job listing
    Save {
        #[arg(long)]
        title: String,

        #[arg(long)]
        company: String,

        #[arg(long)]
        link: String,

        /// Fit with the profile, between 0 and 1
        #[arg(long)]
        fit_score: f64,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        salary: Option<String>,
    },

    /// Show what is recorded for a job link
    Check {
        link: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    Saved,
    Applied,
    /// Any failed attempt
    Failed,
    NoEasyApply,
    SubmissionError,
    MultiStep,
    NoSubmitButton,
    Error,
}

impl StatusFilter {
    pub fn matches(&self, status: &ApplicationStatus) -> bool {
        match self {
            StatusFilter::Failed => status.is_failure(),
            other => other
                .to_possible_value()
                .map(|value| value.get_name() == status.tag())
                .unwrap_or(false),
        }
    }
}

pub async fn cmd_jobs(args: JobsArgs, ctx: &CliContext) -> Result<()> {
    match args.action {
        JobsAction::List { status } => {
            let records: Vec<JobRecord> = ctx
                .store()
                .list_all()
                .await?
                .into_iter()
                .filter(|record| status.map_or(true, |filter| filter.matches(&record.status)))
                .collect();
            emit(ctx.output(), &records, |records| {
                if records.is_empty() {
                    println!("No jobs recorded in {}", ctx.config().store_path.display());
                    return;
                }
                for record in records {
                    print_record(record);
                }
                println!("{} record(s)", records.len());
            })?;
        }
        JobsAction::Save {
            title,
            company,
            link,
            fit_score,
            location,
            salary,
        } => {
            let posting = JobPosting {
                title,
                link,
                company,
                fit_score,
                location,
                salary,
            };
            let result = ctx.actions().save_job(posting).await;
            if let Some(error) = result.error {
                bail!(error);
            }
            println!("{}", result.extracted_content.unwrap_or_default());
        }
        JobsAction::Check { link } => {
            let records = ctx.store().find_by_link(&link).await?;
            emit(ctx.output(), &records, |records| {
                if records.is_empty() {
                    println!("No record for {link}");
                }
                for record in records {
                    print_record(record);
                }
                if records.iter().any(JobRecord::is_applied) {
                    println!("Already applied; apply_to_job will skip this link");
                }
            })?;
        }
    }
    Ok(())
}

fn print_record(record: &JobRecord) {
    println!(
        "[{:.1}] {} | {} at {}",
        record.fit_score, record.status, record.title, record.company
    );
    println!("      {}", record.link);
    let details: Vec<&str> = [record.location.as_deref(), record.salary.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !details.is_empty() {
        println!("      {}", details.join(" | "));
    }
}
