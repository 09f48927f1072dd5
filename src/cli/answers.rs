use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use jobpilot::answers::Answer;

use super::context::CliContext;
use super::output::emit;

#[derive(Args, Clone, Debug)]
pub struct AnswersArgs {
    #[command(subcommand)]
    pub action: AnswersAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum AnswersAction {
    /// List built-in and configured answers
    List,

    /// Find the answer for a form question
    Lookup {
        question: String,
    },
}

pub async fn cmd_answers(args: AnswersArgs, ctx: &CliContext) -> Result<()> {
    let actions = ctx.actions();
    let book = actions.answers();
    match args.action {
        AnswersAction::List => {
            let answers: Vec<Answer<'_>> = book.iter().collect();
            emit(ctx.output(), &answers, |answers| {
                for answer in answers {
                    println!("{:<24} {}", answer.key, answer.answer);
                }
            })?;
        }
        AnswersAction::Lookup { question } => match book.lookup(&question) {
            Some(answer) => emit(ctx.output(), &answer, |answer| {
                println!("{}", answer.answer);
            })?,
            None => bail!("No canned answer for: {question}"),
        },
    }
    Ok(())
}
