//! Application registration, audit fetch, soft-delete, and 409 recovery.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use jobprobe_cli::application::ports::HttpMethod;
use jobprobe_cli::application::services::{PlatformClient, Registration};
use jobprobe_cli::domain::{DefinitionError, RequestFailure, Session};
use serde_json::json;

use crate::helpers::{
    FakeClock, FakeTransport, MemoryArtifacts, RecordingReporter, Reply, ok, rejected, session,
};

const TEMPLATE: &str =
    r#"{"id":"sleeper","version":"0.1","jobAttributes":{"execSystemId":"${EXEC_SYSTEM_ID}"}}"#;
const UNDELETE: &str = "apps/sleeper/undelete";

fn conflict(body: &str) -> Reply {
    Reply::Status(409, body.to_string())
}

#[test]
fn successful_registration_fetches_and_persists_stored_definition() {
    let transport = FakeTransport::new()
        .post("apps", ok(json!({ "url": "apps/sleeper" })))
        .get("apps/sleeper/0.1", Reply::Text(r#"{"stored":true}"#.into()));
    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = session();
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);

    let status = client.register_app(TEMPLATE).unwrap();

    assert!(status.is_success());
    let stored = artifacts.text("sleeper_0.1_config.json").unwrap();
    assert_eq!(stored, r#"{"stored":true}"#);
    assert!(artifacts.text("sleeper_0.1_create.json").is_none());
    let create = &transport.requests()[0];
    let body = create.body.as_deref().unwrap();
    assert!(
        body.contains(r#""execSystemId":"k8s-exec""#),
        "placeholder not substituted: {body}"
    );
}

#[test]
fn rejected_registration_persists_response_and_returns_status() {
    let transport = FakeTransport::new().post("apps", rejected("error"));
    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = session();
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);

    let status = client.register_app(TEMPLATE).unwrap();

    assert_eq!(status.as_str(), "error");
    let response = artifacts.text("sleeper_0.1_create.json").unwrap();
    assert!(response.contains("error"));
    let requests = transport.requests().len();
    assert_eq!(requests, 1, "no audit fetch after rejection");
}

#[test]
fn conflict_is_recovered_by_undeleting() {
    let transport = FakeTransport::new()
        .post("apps", conflict("exists"))
        .post(UNDELETE, ok(json!({ "changes": 1 })));
    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = session();
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);

    let (app, registration) = client.register_or_recover(TEMPLATE).unwrap();

    assert_eq!(app.id, "sleeper");
    let Registration::Recovered(status) = &registration else {
        panic!("expected recovery, got {registration:?}");
    };
    assert!(status.is_success());
    assert_eq!(
        transport.paths(),
        vec!["POST apps", "POST apps/sleeper/undelete"]
    );
}

#[test]
fn other_http_failures_propagate_without_undelete() {
    let transport = FakeTransport::new().post("apps", Reply::Status(500, "boom".into()));
    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = session();
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);

    let err = client.register_or_recover(TEMPLATE).unwrap_err();

    let failure = RequestFailure::find(&err).unwrap();
    assert_eq!(failure.status, 500);
    assert_eq!(failure.body, "boom");
    assert_eq!(transport.count(HttpMethod::Post, UNDELETE), 0);
}

#[test]
fn failed_undelete_after_conflict_propagates() {
    let transport = FakeTransport::new()
        .post("apps", conflict(""))
        .post(UNDELETE, Reply::Status(403, "denied".into()));
    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = session();
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);

    let err = client.register_or_recover(TEMPLATE).unwrap_err();
    assert_eq!(RequestFailure::find(&err).unwrap().status, 403);
}

#[test]
fn delete_state_rejection_is_persisted() {
    let transport = FakeTransport::new().post("apps/sleeper/delete", rejected("error"));
    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = session();
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);

    let status = client.set_app_delete_state("sleeper", true).unwrap();

    assert!(!status.is_success());
    assert!(artifacts.text("sleeper_delete.json").is_some());
    let request = &transport.requests()[0];
    assert_eq!(request.body, None);
    assert!(!request.headers.contains_key("Content-type"));
}

#[test]
fn missing_resource_id_fails_before_any_request() {
    let transport = FakeTransport::new();
    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = Session::new(Some("tok".into()), "http://tapis.test", "");
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);

    let err = client.register_app(TEMPLATE).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DefinitionError>(),
        Some(DefinitionError::MissingResourceId { .. })
    ));
    assert!(transport.requests().is_empty());
}

#[test]
fn other_placeholders_are_reported() {
    let template =
        r#"{"id":"sleeper","version":"0.1","dir":"${JobWorkingDir}","sys":"${EXEC_SYSTEM_ID}"}"#;
    let transport = FakeTransport::new().post("apps", rejected("error"));
    let artifacts = MemoryArtifacts::new();
    let clock = FakeClock::new();
    let reporter = RecordingReporter::new();
    let session = session();
    let client = PlatformClient::new(&session, &transport, &artifacts, &clock, &reporter);

    client.register_app(template).unwrap();
    assert!(reporter.contains("${JobWorkingDir}"));
}
