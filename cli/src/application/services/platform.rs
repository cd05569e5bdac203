//! Application service — the authenticated platform client.
//!
//! `PlatformClient` bundles the session with the ports every use-case needs.
//! The resource, job, and artifact operations are implemented on it in their
//! own modules (`apps`, `jobs`, `artifacts`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use jobprobe_common::validate_path_segment;

use crate::application::ports::{
    ApiRequest, Clock, HttpMethod, LocalArtifactWriter, ProgressReporter, Transport,
};
use crate::domain::{Envelope, Headers, PollSettings, Session};

/// Authenticated access to the platform for one run.
pub struct PlatformClient<'a> {
    session: &'a Session,
    transport: &'a dyn Transport,
    artifacts: &'a dyn LocalArtifactWriter,
    clock: &'a dyn Clock,
    reporter: &'a dyn ProgressReporter,
    poll: PollSettings,
}

impl<'a> PlatformClient<'a> {
    pub fn new(
        session: &'a Session,
        transport: &'a dyn Transport,
        artifacts: &'a dyn LocalArtifactWriter,
        clock: &'a dyn Clock,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            session,
            transport,
            artifacts,
            clock,
            reporter,
            poll: PollSettings::default(),
        }
    }

    #[must_use]
    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.session
    }

    #[must_use]
    pub fn poll_settings(&self) -> PollSettings {
        self.poll
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport
    }

    pub(crate) fn artifacts(&self) -> &dyn LocalArtifactWriter {
        self.artifacts
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock
    }

    pub(crate) fn reporter(&self) -> &dyn ProgressReporter {
        self.reporter
    }

    /// Send a request and parse the JSON envelope of its text response.
    pub(crate) fn call(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &Headers,
        body: Option<&str>,
    ) -> Result<Envelope> {
        let request = ApiRequest {
            method,
            path,
            headers,
            body,
        };
        let text = self.transport.request_text(&request)?;
        Envelope::parse(text).with_context(|| format!("{method} {path}"))
    }

    /// Persist a response document for post-mortem inspection.
    pub(crate) fn persist(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.artifacts.write_diagnostic(name, contents)?;
        tracing::debug!(file = %path.display(), "diagnostic written");
        Ok(path)
    }
}

/// Refuse identifiers that would change the shape of a resource path.
pub(crate) fn checked_segment(field: &str, value: &str) -> Result<()> {
    validate_path_segment(value)
        .map_err(|reason| anyhow::anyhow!("invalid {field} '{value}': {reason}"))
}
