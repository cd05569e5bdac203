//! `jobprobe run` — the verification suite.

use anyhow::Result;
use clap::Args;
use thiserror::Error;

use crate::app::AppContext;
use crate::application::services::SuiteRunner;
use crate::domain::{Outcome, Scenario};
use crate::output::json::print_document;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Run only this scenario and what it depends on (repeatable):
    /// create-apps, submit-jobs, cancel-job, fail-job
    #[arg(long = "scenario", value_parser = parse_scenario)]
    pub scenarios: Vec<Scenario>,
}

/// The suite finished with failed or skipped scenarios.
#[derive(Debug, Error)]
#[error("{failed} scenario(s) failed, {skipped} skipped")]
pub struct SuiteFailed {
    pub failed: usize,
    pub skipped: usize,
}

fn parse_scenario(name: &str) -> Result<Scenario, String> {
    Scenario::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Scenario::ALL.iter().map(|s| s.name()).collect();
        format!(
            "unknown scenario '{name}' (expected one of: {})",
            known.join(", ")
        )
    })
}

/// Entry point for `jobprobe run`.
///
/// # Errors
///
/// Returns an error if authentication fails, or `SuiteFailed` once the
/// report has been rendered if any scenario did not pass.
pub fn run(ctx: &AppContext, args: &RunArgs) -> Result<()> {
    if !ctx.is_json() {
        ctx.renderer()
            .render_plan(&Scenario::plan(&args.scenarios), ctx.base_url());
    }
    let reporter = ctx.reporter();
    let session = ctx.establish_session(&*reporter)?;
    let client = ctx.client(&session, &*reporter);

    let report = SuiteRunner::new(&client, ctx.definitions()).run(&args.scenarios);

    if ctx.is_json() {
        print_document(&report)?;
    } else {
        ctx.renderer().render_report(&report);
    }

    if report.succeeded() {
        Ok(())
    } else {
        Err(SuiteFailed {
            failed: report.count(Outcome::Failed),
            skipped: report.count(Outcome::Skipped),
        }
        .into())
    }
}
