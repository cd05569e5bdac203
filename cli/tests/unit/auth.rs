//! Token exchange and session construction.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use jobprobe_cli::application::services::auth::{authenticate, establish_session};
use jobprobe_cli::domain::{ApiOutcome, Credentials, RequestFailure};
use mockall::mock;
use mockall::predicate::str::contains;
use serde_json::json;

use crate::helpers::{FakeTransport, MemoryArtifacts, RecordingReporter, Reply, ok, rejected};

mock! {
    pub Reporter {}

    impl jobprobe_cli::application::ports::ProgressReporter for Reporter {
        fn step(&self, message: &str);
        fn success(&self, message: &str);
        fn warn(&self, message: &str);
    }
}

const TOKENS: &str = "oauth2/tokens";

fn token_reply() -> Reply {
    ok(json!({ "access_token": { "access_token": "tok-abc", "expires_in": 14400 } }))
}

#[test]
fn token_is_extracted_on_success() {
    let transport = FakeTransport::new().post(TOKENS, token_reply());
    let artifacts = MemoryArtifacts::new();
    let reporter = RecordingReporter::new();
    let creds = Credentials::new("alice", "s3cret");

    let outcome = authenticate(&transport, &artifacts, &reporter, &creds).unwrap();

    assert_eq!(outcome, ApiOutcome::Success("tok-abc".to_string()));
    assert!(artifacts.names().is_empty());
    let request = &transport.requests()[0];
    assert!(!request.headers.contains_key("X-Tapis-Token"));
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["password"], "s3cret");
    assert_eq!(body["grant_type"], "password");
}

#[test]
fn rejected_exchange_is_persisted_and_warned() {
    let transport = FakeTransport::new().post(TOKENS, rejected("error"));
    let artifacts = MemoryArtifacts::new();
    let mut reporter = MockReporter::new();
    reporter
        .expect_warn()
        .with(contains("alice_token.json"))
        .times(1)
        .return_const(());
    reporter.expect_step().never();
    reporter.expect_success().never();

    let creds = Credentials::new("alice", "bad");
    let session = establish_session(
        &transport,
        &artifacts,
        &reporter,
        &creds,
        "http://tapis.test",
        "k8s-exec",
    )
    .unwrap();

    assert!(!session.is_authenticated());
    let response = artifacts.text("alice_token.json").unwrap();
    assert!(response.contains("error"));
}

#[test]
fn session_carries_token_and_resource() {
    let transport = FakeTransport::new().post(TOKENS, token_reply());
    let artifacts = MemoryArtifacts::new();
    let mut reporter = MockReporter::new();
    reporter
        .expect_success()
        .with(contains("alice"))
        .times(1)
        .return_const(());

    let creds = Credentials::new("alice", "s3cret");
    let session = establish_session(
        &transport,
        &artifacts,
        &reporter,
        &creds,
        "http://tapis.test",
        "k8s-exec",
    )
    .unwrap();

    assert_eq!(session.token(), Some("tok-abc"));
    assert_eq!(session.resource_id(), "k8s-exec");
    assert_eq!(session.base_url(), "http://tapis.test");
}

#[test]
fn http_failure_is_a_hard_error() {
    let transport = FakeTransport::new().post(TOKENS, Reply::Status(401, "unauthorized".into()));
    let artifacts = MemoryArtifacts::new();
    let reporter = RecordingReporter::new();
    let creds = Credentials::new("alice", "s3cret");

    let err = authenticate(&transport, &artifacts, &reporter, &creds).unwrap_err();
    assert_eq!(RequestFailure::find(&err).unwrap().status, 401);
    assert!(artifacts.names().is_empty());
}

#[test]
fn malformed_token_response_is_an_error() {
    let transport = FakeTransport::new().post(TOKENS, Reply::Text("<html>".into()));
    let artifacts = MemoryArtifacts::new();
    let reporter = RecordingReporter::new();
    let creds = Credentials::new("alice", "s3cret");

    assert!(authenticate(&transport, &artifacts, &reporter, &creds).is_err());
}
