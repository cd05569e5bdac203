//! `jobprobe submit <definition>` — submit one job and watch it.

use std::convert::Infallible;

use anyhow::{Result, bail};
use clap::Args;
use jobprobe_common::JobStatus;

use crate::app::AppContext;
use crate::commands::load_definition;
use crate::domain::JobDefinition;
use crate::output::json::{job_run_document, print_document};

/// Arguments for the submit command.
#[derive(Args)]
pub struct SubmitArgs {
    /// Definition file, or the name of a built-in definition (e.g. sleep_job.json)
    pub definition: String,

    /// Cancel the job as soon as it is seen running
    #[arg(long)]
    pub cancel_on_running: bool,

    /// Fail unless the job ends in this status (e.g. FINISHED)
    #[arg(long, value_name = "STATUS", value_parser = parse_status)]
    pub expect: Option<JobStatus>,
}

fn parse_status(value: &str) -> Result<JobStatus, Infallible> {
    Ok(JobStatus::from(value.trim().to_ascii_uppercase()))
}

/// Entry point for `jobprobe submit`.
///
/// # Errors
///
/// Returns an error if the submission is rejected, polling fails, or the
/// final status differs from `--expect`.
pub fn run(ctx: &AppContext, args: &SubmitArgs) -> Result<()> {
    let definition = JobDefinition::parse(load_definition(ctx, &args.definition)?)?;
    let reporter = ctx.reporter();
    let session = ctx.establish_session(&*reporter)?;
    let client = ctx.client(&session, &*reporter);

    let run = client.run_job(&definition, args.cancel_on_running)?;

    if ctx.is_json() {
        print_document(&job_run_document(&run))?;
    } else {
        ctx.renderer().render_job_run(&run);
    }

    if let Some(expected) = &args.expect
        && run.job.status() != expected
    {
        bail!(
            "job {} ended {}, expected {expected}",
            run.job.diagnostic_id(),
            run.job.status()
        );
    }
    Ok(())
}
