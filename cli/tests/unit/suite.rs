//! Suite runner: scenario order, dependency skips, teardown.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use jobprobe_cli::application::ports::HttpMethod;
use jobprobe_cli::application::services::{PlatformClient, SuiteRunner};
use jobprobe_cli::domain::{Outcome, Scenario};
use serde_json::json;

use crate::helpers::{
    FakeClock, FakeTransport, MapDefinitions, MemoryArtifacts, RecordingReporter, Reply,
    job_status, ok, output_listing, rejected, session,
};

const SUBMIT: &str = "jobs/submit";

fn accepted(uuid: &str) -> Reply {
    ok(json!({ "uuid": uuid }))
}

fn definitions() -> MapDefinitions {
    MapDefinitions::default()
        .with(
            "sleep_app.json",
            r#"{"id":"sleep","version":"1","execSystemId":"${EXEC_SYSTEM_ID}"}"#,
        )
        .with(
            "mpi_pi_app.json",
            r#"{"id":"mpi-pi","version":"1","execSystemId":"${EXEC_SYSTEM_ID}"}"#,
        )
        .with("sleep_job.json", r#"{"name":"sleep-job"}"#)
        .with("mpi_pi_job.json", r#"{"name":"mpi-job"}"#)
        .with("sleep_cancel_job.json", r#"{"name":"cancel-job"}"#)
        .with("sleep_fail_job.json", r#"{"name":"fail-job"}"#)
}

fn with_apps(transport: FakeTransport) -> FakeTransport {
    transport
        .post("apps", ok(json!({})))
        .get("apps/sleep/1", Reply::Text("{}".into()))
        .get("apps/mpi-pi/1", Reply::Text("{}".into()))
        .post("apps/sleep/delete", ok(json!({})))
        .post("apps/mpi-pi/delete", ok(json!({})))
}

fn with_job(transport: FakeTransport, uuid: &str, statuses: &[&str]) -> FakeTransport {
    let status_path = format!("jobs/{uuid}/status");
    let mut t = transport.get(format!("jobs/{uuid}/output/list/"), output_listing(0));
    for s in statuses {
        t = t.get(status_path.clone(), job_status(s));
    }
    t
}

#[test]
fn full_suite_passes_and_tears_down_apps() {
    let transport = with_apps(FakeTransport::new())
        .post(SUBMIT, accepted("u-sleep"))
        .post(SUBMIT, accepted("u-mpi"))
        .post(SUBMIT, accepted("u-cancel"))
        .post(SUBMIT, accepted("u-fail"))
        .post("jobs/u-cancel/cancel", ok(json!({})));
    let transport = with_job(transport, "u-sleep", &["RUNNING", "FINISHED"]);
    let transport = with_job(transport, "u-mpi", &["FINISHED"]);
    let transport = with_job(transport, "u-cancel", &["RUNNING", "CANCELLED"]);
    let transport = with_job(transport, "u-fail", &["FAILED"]);

    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = session();
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);
    let defs = definitions();

    let report = SuiteRunner::new(&client, &defs).run(&[]);

    assert!(report.succeeded(), "report: {report:?}");
    assert_eq!(report.count(Outcome::Passed), 4);
    let order: Vec<Scenario> = report.scenarios.iter().map(|r| r.scenario).collect();
    assert_eq!(order, Scenario::ALL.to_vec());
    let deleted: Vec<&str> = report.teardown.iter().map(|t| t.app_id.as_str()).collect();
    assert_eq!(deleted, vec!["sleep", "mpi-pi"]);
    assert!(report.teardown.iter().all(|t| t.success));
    assert_eq!(transport.count(HttpMethod::Post, "jobs/u-cancel/cancel"), 1);
}

#[test]
fn failed_app_registration_skips_job_scenarios() {
    let transport = FakeTransport::new().post("apps", rejected("error"));
    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = session();
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);
    let defs = definitions();

    let report = SuiteRunner::new(&client, &defs).run(&[]);
    let outcome = |s| report.outcome_of(s);

    assert!(!report.succeeded());
    assert_eq!(outcome(Scenario::CreateApps), Some(Outcome::Failed));
    for s in [Scenario::SubmitJobs, Scenario::CancelJob, Scenario::FailJob] {
        assert_eq!(outcome(s), Some(Outcome::Skipped), "{s}");
    }
    assert!(report.teardown.is_empty(), "nothing was registered");
    assert_eq!(transport.count(HttpMethod::Post, SUBMIT), 0);
}

#[test]
fn a_failing_job_scenario_does_not_stop_the_next() {
    let transport = with_apps(FakeTransport::new())
        .post(SUBMIT, accepted("u-sleep"))
        .post(SUBMIT, accepted("u-fail"));
    // sleep_job ends FAILED instead of FINISHED, so submit-jobs fails before
    // mpi_pi_job; fail-job still runs and passes.
    let transport = with_job(transport, "u-sleep", &["FAILED"]);
    let transport = with_job(transport, "u-fail", &["FAILED"]);

    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = session();
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);
    let defs = definitions();

    let selected = [Scenario::SubmitJobs, Scenario::FailJob];
    let report = SuiteRunner::new(&client, &defs).run(&selected);
    let outcome = |s| report.outcome_of(s);

    assert_eq!(outcome(Scenario::CreateApps), Some(Outcome::Passed));
    assert_eq!(outcome(Scenario::SubmitJobs), Some(Outcome::Failed));
    assert_eq!(outcome(Scenario::CancelJob), None, "not selected");
    assert_eq!(outcome(Scenario::FailJob), Some(Outcome::Passed));
    let detail = report.scenarios[1].detail.as_deref().unwrap();
    assert!(
        detail.contains("ended FAILED, expected FINISHED"),
        "{detail}"
    );
    assert_eq!(report.teardown.len(), 2);
}

#[test]
fn conflicting_app_is_recovered_and_still_torn_down() {
    let transport = FakeTransport::new()
        .post("apps", Reply::Status(409, String::new()))
        .post("apps/sleep/undelete", ok(json!({})))
        .post("apps/mpi-pi/undelete", ok(json!({})))
        .post("apps/sleep/delete", ok(json!({})))
        .post("apps/mpi-pi/delete", rejected("error"));
    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = session();
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);
    let defs = definitions();

    let report = SuiteRunner::new(&client, &defs).run(&[Scenario::CreateApps]);

    assert!(report.succeeded());
    assert_eq!(report.scenarios.len(), 1);
    assert_eq!(report.teardown.len(), 2);
    assert!(report.teardown[0].success);
    assert!(!report.teardown[1].success);
    assert_eq!(report.teardown[1].status, "error");
    assert!(artifacts.text("mpi-pi_delete.json").is_some());
}

#[test]
fn missing_definition_fails_only_its_scenario() {
    let transport = with_apps(FakeTransport::new());
    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = session();
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);
    let defs = MapDefinitions::default()
        .with("sleep_app.json", r#"{"id":"sleep","version":"1"}"#)
        .with("mpi_pi_app.json", r#"{"id":"mpi-pi","version":"1"}"#);

    let report = SuiteRunner::new(&client, &defs).run(&[Scenario::CancelJob]);
    let outcome = |s| report.outcome_of(s);

    assert_eq!(outcome(Scenario::CreateApps), Some(Outcome::Passed));
    assert_eq!(outcome(Scenario::CancelJob), Some(Outcome::Failed));
    let detail = report.scenarios[1].detail.as_deref().unwrap();
    assert!(detail.contains("sleep_cancel_job.json"), "{detail}");
}
