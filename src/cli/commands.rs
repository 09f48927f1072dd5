use clap::Subcommand;

use super::actions::ActionsArgs;
use super::answers::AnswersArgs;
use super::config::ConfigArgs;
use super::cv::CvArgs;
use super::jobs::JobsArgs;
use super::rehearse::RehearseArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Inspect and add saved jobs and application outcomes
    Jobs(JobsArgs),

    /// Show or query the canned form answers
    Answers(AnswersArgs),

    /// Show the CV text handed to the agent
    Cv(CvArgs),

    /// Manage JobPilot configuration
    Config(ConfigArgs),

    /// Print the agent action catalog
    Actions(ActionsArgs),

    /// Run detection and the apply flow against a scripted page scenario
    Rehearse(RehearseArgs),
}
