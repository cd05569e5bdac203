//! Job record as tracked by the harness.

use jobprobe_common::JobStatus;

/// A single job execution. The uuid is assigned once by the platform and
/// never changes; the status is only ever what the platform last reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    name: String,
    uuid: Option<String>,
    status: JobStatus,
}

impl Job {
    /// A job that has been named but not yet accepted by the platform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: None,
            status: JobStatus::Submitted,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    #[must_use]
    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    /// Record the server-assigned uuid. Returns `false` (and keeps the
    /// original) if one was already assigned.
    pub fn assign_uuid(&mut self, uuid: impl Into<String>) -> bool {
        if self.uuid.is_some() {
            return false;
        }
        self.uuid = Some(uuid.into());
        true
    }

    /// Record the latest status reported by the platform.
    pub fn observe(&mut self, status: JobStatus) {
        self.status = status;
    }

    /// Identifier used to name this job's diagnostic files: the uuid when
    /// known, otherwise the caller-assigned name.
    #[must_use]
    pub fn diagnostic_id(&self) -> &str {
        self.uuid.as_deref().unwrap_or(&self.name)
    }
}
