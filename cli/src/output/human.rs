//! Human-readable terminal renderer.
//!
//! Each `*_lines` builder returns the exact lines a `render_*` call prints,
//! so the layout can be checked without capturing stdout.

use owo_colors::OwoColorize as _;

use crate::application::services::JobRun;
use crate::domain::{Outcome, Scenario, SuiteReport};
use crate::output::OutputContext;

/// Indent of a scenario's detail line, aligned under its name.
const DETAIL_INDENT: &str = "           ";

/// Renders results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    #[must_use]
    pub fn plan_line(&self, plan: &[Scenario], base_url: &str) -> String {
        let names: Vec<&str> = plan.iter().map(|s| s.name()).collect();
        let message = format!("running {} against {base_url}", names.join(", "));
        self.ctx.info_line(&message)
    }

    /// Scenario table, teardown and totals of a suite run.
    #[must_use]
    pub fn report_lines(&self, report: &SuiteReport) -> Vec<String> {
        let styles = &self.ctx.styles;
        let mut lines = vec![String::new(), self.ctx.header_line("Scenarios:")];
        for result in &report.scenarios {
            let label = format!("{:<8}", outcome_label(result.outcome));
            let style = match result.outcome {
                Outcome::Passed => styles.success,
                Outcome::Failed => styles.error,
                Outcome::Skipped => styles.warning,
            };
            lines.push(format!("  {} {}", label.style(style), result.scenario));
            if let Some(detail) = &result.detail {
                lines.push(format!("{DETAIL_INDENT}{}", detail.style(styles.dim)));
            }
        }

        if !report.teardown.is_empty() {
            lines.push(String::new());
            lines.push(self.ctx.header_line("Teardown:"));
            for entry in &report.teardown {
                let line = if entry.success {
                    let message = format!("deleted app {}", entry.app_id);
                    self.ctx.success_line(&message)
                } else {
                    let message = format!("app {} not deleted: {}", entry.app_id, entry.status);
                    self.ctx.warn_line(&message)
                };
                lines.push(line);
            }
        }

        lines.push(String::new());
        lines.push(self.ctx.kv_line("Summary:", &format_summary(report)));
        lines
    }

    /// Outcome of a single submitted job.
    #[must_use]
    pub fn job_run_lines(&self, run: &JobRun) -> Vec<String> {
        let kv = |key: &str, value: &str| self.ctx.kv_line(key, value);
        let mut lines = vec![String::new(), kv("Job:", run.job.name())];
        if let Some(uuid) = run.job.uuid() {
            lines.push(kv("UUID:", uuid));
        }
        lines.push(kv("Status:", run.job.status().as_str()));
        if run.cancel_attempts > 0 {
            lines.push(kv("Cancels:", &run.cancel_attempts.to_string()));
        }
        match &run.archive {
            Some(archive) => {
                lines.push(kv("Output:", &archive.path.display().to_string()));
                lines.push(kv("SHA-256:", &archive.sha256));
            }
            None => lines.push(kv("Output:", "none")),
        }
        lines
    }

    /// Confirmation that an application's soft-delete flag was changed.
    #[must_use]
    pub fn app_state_line(&self, id: &str, deleted: bool) -> String {
        let verb = if deleted { "deleted" } else { "restored" };
        self.ctx.success_line(&format!("app {id} {verb}"))
    }

    /// Confirmation that an application is registered.
    #[must_use]
    pub fn registration_line(&self, id: &str, recovered: bool) -> String {
        let verb = if recovered { "recovered" } else { "registered" };
        self.ctx.success_line(&format!("app {id} {verb}"))
    }

    /// Announce which scenarios are about to run and where.
    pub fn render_plan(&self, plan: &[Scenario], base_url: &str) {
        self.ctx.emit(&self.plan_line(plan, base_url));
    }

    pub fn render_report(&self, report: &SuiteReport) {
        self.emit_all(&self.report_lines(report));
    }

    pub fn render_job_run(&self, run: &JobRun) {
        self.emit_all(&self.job_run_lines(run));
    }

    pub fn render_app_state(&self, id: &str, deleted: bool) {
        self.ctx.emit(&self.app_state_line(id, deleted));
    }

    pub fn render_registration(&self, id: &str, recovered: bool) {
        self.ctx.emit(&self.registration_line(id, recovered));
    }

    fn emit_all(&self, lines: &[String]) {
        for line in lines {
            self.ctx.emit(line);
        }
    }
}

#[must_use]
pub fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Passed => "PASS",
        Outcome::Failed => "FAIL",
        Outcome::Skipped => "SKIP",
    }
}

/// `"2 passed, 1 failed, 1 skipped in 3m 12s"`.
#[must_use]
pub fn format_summary(report: &SuiteReport) -> String {
    let elapsed = (report.finished_at - report.started_at)
        .to_std()
        .unwrap_or_default();
    let elapsed = std::time::Duration::from_secs(elapsed.as_secs());
    format!(
        "{} passed, {} failed, {} skipped in {}",
        report.count(Outcome::Passed),
        report.count(Outcome::Failed),
        report.count(Outcome::Skipped),
        humantime::format_duration(elapsed)
    )
}
