//! Application service — the end-to-end verification suite.
//!
//! Scenarios run in a fixed order. A scenario whose dependency did not pass
//! is skipped, a failing scenario never stops the ones after it, and every
//! application registered along the way is soft-deleted at the end.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use jobprobe_common::JobStatus;

use crate::application::ports::DefinitionSource;
use crate::application::services::platform::PlatformClient;
use crate::domain::{JobDefinition, Outcome, Scenario, ScenarioResult, SuiteReport, TeardownResult};

/// Application definitions registered by `create-apps`.
pub const APP_DEFINITIONS: [&str; 2] = ["sleep_app.json", "mpi_pi_app.json"];

/// A job the suite submits and the status it must end in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCase {
    pub definition: &'static str,
    pub expected: JobStatus,
    pub cancel_on_running: bool,
}

fn case(definition: &'static str, expected: JobStatus, cancel_on_running: bool) -> JobCase {
    JobCase {
        definition,
        expected,
        cancel_on_running,
    }
}

/// Jobs run by each job scenario.
#[must_use]
pub fn job_cases(scenario: Scenario) -> Vec<JobCase> {
    match scenario {
        Scenario::CreateApps => Vec::new(),
        Scenario::SubmitJobs => vec![
            case("sleep_job.json", JobStatus::Finished, false),
            case("mpi_pi_job.json", JobStatus::Finished, false),
        ],
        Scenario::CancelJob => vec![case("sleep_cancel_job.json", JobStatus::Cancelled, true)],
        Scenario::FailJob => vec![case("sleep_fail_job.json", JobStatus::Failed, false)],
    }
}

pub struct SuiteRunner<'c, 'a> {
    client: &'c PlatformClient<'a>,
    definitions: &'c dyn DefinitionSource,
    registered: Vec<String>,
}

impl<'c, 'a> SuiteRunner<'c, 'a> {
    pub fn new(client: &'c PlatformClient<'a>, definitions: &'c dyn DefinitionSource) -> Self {
        Self {
            client,
            definitions,
            registered: Vec::new(),
        }
    }

    /// Run `selection` (plus dependencies; empty means all) then tear down.
    pub fn run(mut self, selection: &[Scenario]) -> SuiteReport {
        let mut report = SuiteReport::started(Utc::now());
        let client = self.client;

        for scenario in Scenario::plan(selection) {
            let started_at = Utc::now();
            let blocked = scenario
                .depends_on()
                .filter(|dep| report.outcome_of(*dep) != Some(Outcome::Passed));

            let (outcome, detail) = if let Some(dep) = blocked {
                let message = format!("skipping {scenario}: {dep} did not pass");
                client.reporter().warn(&message);
                (Outcome::Skipped, Some(format!("{dep} did not pass")))
            } else {
                client.reporter().step(&format!("running {scenario}"));
                match self.execute(scenario) {
                    Ok(()) => {
                        client.reporter().success(&format!("{scenario} passed"));
                        (Outcome::Passed, None)
                    }
                    Err(err) => {
                        let detail = format!("{err:#}");
                        tracing::warn!(%scenario, error = %detail, "scenario failed");
                        let message = format!("{scenario} failed: {detail}");
                        client.reporter().warn(&message);
                        (Outcome::Failed, Some(detail))
                    }
                }
            };

            report.scenarios.push(ScenarioResult {
                scenario,
                outcome,
                detail,
                started_at,
                finished_at: Utc::now(),
            });
        }

        report.teardown = self.teardown();
        report.finished_at = Utc::now();
        report
    }

    fn execute(&mut self, scenario: Scenario) -> Result<()> {
        match scenario {
            Scenario::CreateApps => self.create_apps(),
            Scenario::SubmitJobs | Scenario::CancelJob | Scenario::FailJob => {
                for case in job_cases(scenario) {
                    self.run_case(case)?;
                }
                Ok(())
            }
        }
    }

    fn create_apps(&mut self) -> Result<()> {
        for name in APP_DEFINITIONS {
            let template = self.definitions.read_definition(name)?;
            let (app, registration) = self
                .client
                .register_or_recover(&template)
                .with_context(|| format!("registering {name}"))?;
            let status = registration.status();
            if !status.is_success() {
                bail!("app {} ended with status '{status}'", app.id);
            }
            self.registered.push(app.id);
        }
        Ok(())
    }

    fn run_case(&self, case: JobCase) -> Result<()> {
        let definition = JobDefinition::parse(self.definitions.read_definition(case.definition)?)
            .with_context(|| format!("parsing {}", case.definition))?;
        let run = self
            .client
            .run_job(&definition, case.cancel_on_running)
            .with_context(|| format!("running {}", case.definition))?;
        let status = run.job.status();
        if *status != case.expected {
            bail!(
                "job {} ended {status}, expected {}",
                run.job.diagnostic_id(),
                case.expected
            );
        }
        Ok(())
    }

    /// Soft-delete every registered application. Failures are recorded, not
    /// raised.
    fn teardown(&self) -> Vec<TeardownResult> {
        self.registered
            .iter()
            .map(|id| match self.client.set_app_delete_state(id, true) {
                Ok(status) => TeardownResult {
                    app_id: id.clone(),
                    success: status.is_success(),
                    status: status.to_string(),
                },
                Err(err) => {
                    let message = format!("deleting app {id} failed: {err:#}");
                    self.client.reporter().warn(&message);
                    TeardownResult {
                        app_id: id.clone(),
                        status: format!("{err:#}"),
                        success: false,
                    }
                }
            })
            .collect()
    }
}
