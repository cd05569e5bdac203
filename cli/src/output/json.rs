//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails, the result documents of the single-call commands, and
//! the serializer for suite reports.

use anyhow::{Context, Result};
use jobprobe_common::LogicalStatus;
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::services::JobRun;
use crate::commands::run::SuiteFailed;
use crate::domain::{PollError, RequestFailure, SettingsError};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Pretty-print any serializable result document.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_document<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Write a result document to stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_document<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", format_document(value)?);
    Ok(())
}

/// Result of `jobprobe submit`. `output` is null when nothing was downloaded.
#[must_use]
pub fn job_run_document(run: &JobRun) -> Value {
    let output = run.archive.as_ref().map(|archive| {
        json!({
            "path": archive.path,
            "bytes": archive.bytes,
            "sha256": archive.sha256,
        })
    });
    json!({
        "name": run.job.name(),
        "uuid": run.job.uuid(),
        "status": run.job.status(),
        "cancel_attempts": run.cancel_attempts,
        "output": output,
    })
}

/// Result of `jobprobe app delete|undelete`.
#[must_use]
pub fn app_state_document(id: &str, deleted: bool, status: &LogicalStatus) -> Value {
    json!({ "app": id, "deleted": deleted, "status": status })
}

/// Result of `jobprobe register`.
#[must_use]
pub fn registration_document(id: &str, status: &LogicalStatus, recovered: bool) -> Value {
    json!({ "app": id, "status": status, "recovered": recovered })
}

/// Stable error code for the JSON error object.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    let caused_by = |pred: fn(&(dyn std::error::Error + 'static)) -> bool| err.chain().any(pred);
    if caused_by(|e| e.is::<SuiteFailed>()) {
        "suite_failed"
    } else if caused_by(|e| e.is::<SettingsError>()) {
        "invalid_settings"
    } else if caused_by(|e| e.is::<PollError>()) {
        "poll_timeout"
    } else if RequestFailure::find(err).is_some() {
        "request_failed"
    } else {
        "error"
    }
}
