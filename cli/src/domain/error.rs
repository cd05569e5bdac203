//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs` or `std::net`. All error types implement
//! `thiserror::Error` and convert to `anyhow::Error` via the `?` operator.

use std::time::Duration;

use thiserror::Error;

// ── Transport errors ──────────────────────────────────────────────────────────

/// HTTP status 409, returned when registering an application that already exists.
pub const CONFLICT: u16 = 409;

/// A response whose HTTP status code was 300 or above.
///
/// The body is read eagerly so callers can inspect it even though the call
/// failed.
#[derive(Debug, Error)]
#[error("request failed with HTTP {status}")]
pub struct RequestFailure {
    pub status: u16,
    pub body: String,
}

impl RequestFailure {
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status == CONFLICT
    }

    /// Find a `RequestFailure` anywhere in an `anyhow` error chain.
    #[must_use]
    pub fn find(err: &anyhow::Error) -> Option<&Self> {
        err.chain().find_map(|cause| cause.downcast_ref::<Self>())
    }
}

// ── Envelope errors ───────────────────────────────────────────────────────────

/// Errors raised while reading a response envelope or definition document.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ── Definition errors ─────────────────────────────────────────────────────────

/// Errors related to application and job definition documents.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("definition is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("definition has no '{field}' field")]
    MissingField { field: &'static str },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidIdentifier {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error(
        "definition references ${{{placeholder}}} but no resource id is configured. \
Set TAPIS_EXEC_SYSTEM_ID or pass --resource-id."
    )]
    MissingResourceId { placeholder: &'static str },
}

// ── Poll errors ───────────────────────────────────────────────────────────────

/// Errors raised by the job status monitor itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollError {
    #[error("job {uuid} was still {last} after {elapsed:?}; giving up")]
    TimedOut {
        uuid: String,
        last: String,
        elapsed: Duration,
    },
}

// ── Settings errors ───────────────────────────────────────────────────────────

/// Errors related to harness settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    #[error("poll timeout ({timeout:?}) is shorter than the poll interval ({interval:?})")]
    TimeoutBelowInterval {
        timeout: Duration,
        interval: Duration,
    },

    #[error(
        "missing credentials: set TAPIS_USERNAME and TAPIS_PASSWORD \
or pass --username/--password"
    )]
    MissingCredentials,
}
