//! Application service — token exchange and session construction.

use anyhow::Result;
use jobprobe_common::{paths, pointers};

use crate::application::ports::{
    ApiRequest, LocalArtifactWriter, ProgressReporter, Transport,
};
use crate::domain::definition::local_file_name;
use crate::domain::session::anonymous_json_headers;
use crate::domain::{ApiOutcome, Credentials, Envelope, Session};

/// Exchange credentials for an access token.
///
/// A logically rejected exchange is not an error: the raw response is
/// written to `{username}_token.json` and `Rejected` is returned.
///
/// # Errors
///
/// Returns an error on transport failure (including HTTP status >= 300),
/// a malformed response, or if the diagnostic file cannot be written.
pub fn authenticate(
    transport: &dyn Transport,
    artifacts: &dyn LocalArtifactWriter,
    reporter: &dyn ProgressReporter,
    credentials: &Credentials,
) -> Result<ApiOutcome<String>> {
    let headers = anonymous_json_headers();
    let body = credentials.token_request_body();
    let text = transport.request_text(&ApiRequest::post(paths::TOKENS, &headers, Some(&body)))?;
    let envelope = Envelope::parse(text)?;

    let outcome = envelope.outcome(|e| e.text_at(pointers::ACCESS_TOKEN).map(str::to_owned));
    if let ApiOutcome::Rejected(status) = &outcome {
        let name = local_file_name(&credentials.username, "token.json");
        let path = artifacts.write_diagnostic(&name, envelope.raw())?;
        let message = format!(
            "token generation for user {} returned status '{status}', response written to {}",
            credentials.username,
            path.display()
        );
        reporter.warn(&message);
    }
    tracing::debug!(user = %credentials.username, success = outcome.is_success(), "token exchange");
    Ok(outcome)
}

/// Authenticate and build the run's session.
///
/// A rejected token exchange still yields a session, without a token; every
/// authenticated call made with it is then expected to fail.
///
/// # Errors
///
/// See [`authenticate`].
pub fn establish_session(
    transport: &dyn Transport,
    artifacts: &dyn LocalArtifactWriter,
    reporter: &dyn ProgressReporter,
    credentials: &Credentials,
    base_url: &str,
    resource_id: &str,
) -> Result<Session> {
    let token = authenticate(transport, artifacts, reporter, credentials)?.success();
    if token.is_some() {
        reporter.success(&format!("authenticated as {}", credentials.username));
    }
    Ok(Session::new(token, base_url, resource_id))
}
