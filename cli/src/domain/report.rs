//! Suite scenarios and the report of a run.
//!
//! This module is intentionally free of I/O. The runner in
//! `application::services::suite` fills a `SuiteReport` in.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ── Scenarios ────────────────────────────────────────────────────────────────

/// One verification scenario of the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Register the sample applications, recovering stale records.
    CreateApps,
    /// Run the sample jobs to `FINISHED`.
    SubmitJobs,
    /// Cancel a running job.
    CancelJob,
    /// Run a job that is expected to fail.
    FailJob,
}

impl Scenario {
    /// Every scenario in execution order.
    pub const ALL: [Self; 4] = [
        Self::CreateApps,
        Self::SubmitJobs,
        Self::CancelJob,
        Self::FailJob,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateApps => "create-apps",
            Self::SubmitJobs => "submit-jobs",
            Self::CancelJob => "cancel-job",
            Self::FailJob => "fail-job",
        }
    }

    /// Scenario that must pass before this one may run.
    #[must_use]
    pub fn depends_on(self) -> Option<Self> {
        match self {
            Self::CreateApps => None,
            Self::SubmitJobs | Self::CancelJob | Self::FailJob => Some(Self::CreateApps),
        }
    }

    /// Look a scenario up by its kebab-case name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Expand a selection with its dependencies, in execution order.
    /// An empty selection means every scenario.
    #[must_use]
    pub fn plan(selection: &[Self]) -> Vec<Self> {
        if selection.is_empty() {
            return Self::ALL.to_vec();
        }
        Self::ALL
            .into_iter()
            .filter(|s| {
                selection.contains(s) || selection.iter().any(|sel| sel.depends_on() == Some(*s))
            })
            .collect()
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Report ───────────────────────────────────────────────────────────────────

/// Final state of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub outcome: Outcome,
    /// Failure chain or skip reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Soft-delete of one registered application during teardown.
#[derive(Debug, Clone, Serialize)]
pub struct TeardownResult {
    pub app_id: String,
    /// Logical status, or the error text if the call failed outright.
    pub status: String,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub scenarios: Vec<ScenarioResult>,
    pub teardown: Vec<TeardownResult>,
}

impl SuiteReport {
    #[must_use]
    pub fn started(at: DateTime<Utc>) -> Self {
        Self {
            started_at: at,
            finished_at: at,
            scenarios: Vec::new(),
            teardown: Vec::new(),
        }
    }

    /// Outcome recorded for `scenario`, if it has run.
    #[must_use]
    pub fn outcome_of(&self, scenario: Scenario) -> Option<Outcome> {
        self.scenarios
            .iter()
            .find(|r| r.scenario == scenario)
            .map(|r| r.outcome)
    }

    #[must_use]
    pub fn count(&self, outcome: Outcome) -> usize {
        self.scenarios
            .iter()
            .filter(|r| r.outcome == outcome)
            .count()
    }

    /// True when every scenario passed. Teardown failures are reported but
    /// do not fail the run.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.scenarios.iter().all(|r| r.outcome == Outcome::Passed)
    }
}
