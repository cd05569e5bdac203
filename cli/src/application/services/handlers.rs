//! Status handlers plugged into the job monitor.
//!
//! A handler sees every observed status and answers whether polling should
//! stop. Handlers keep their own state across ticks; the monitor only ORs
//! their answers together.

use anyhow::Result;
use jobprobe_common::JobStatus;

use crate::application::services::artifacts::DownloadedArchive;
use crate::application::services::platform::PlatformClient;

/// Reacts to one observed job status.
pub trait StatusHandler {
    /// Return `Ok(true)` to ask the monitor to stop after this tick.
    ///
    /// # Errors
    ///
    /// Any error aborts the monitor and propagates to its caller.
    fn handle(&mut self, status: &JobStatus, job_uuid: &str) -> Result<bool>;
}

impl<F> StatusHandler for F
where
    F: FnMut(&JobStatus, &str) -> Result<bool>,
{
    fn handle(&mut self, status: &JobStatus, job_uuid: &str) -> Result<bool> {
        self(status, job_uuid)
    }
}

/// Stops on any terminal status, downloading the job's output the first
/// time one is seen if the job produced any.
pub struct FinishAndCollect<'c, 'a> {
    client: &'c PlatformClient<'a>,
    archive: Option<DownloadedArchive>,
    checked: bool,
}

impl<'c, 'a> FinishAndCollect<'c, 'a> {
    #[must_use]
    pub fn new(client: &'c PlatformClient<'a>) -> Self {
        Self {
            client,
            archive: None,
            checked: false,
        }
    }

    /// The archive downloaded on the terminal tick, if output existed.
    #[must_use]
    pub fn archive(&self) -> Option<&DownloadedArchive> {
        self.archive.as_ref()
    }
}

impl StatusHandler for FinishAndCollect<'_, '_> {
    fn handle(&mut self, status: &JobStatus, job_uuid: &str) -> Result<bool> {
        if !status.is_terminal() {
            return Ok(false);
        }
        if !self.checked {
            self.checked = true;
            let count = self.client.output_count(job_uuid)?;
            tracing::debug!(job = job_uuid, count, "output records listed");
            if count > 0 {
                let archive = self.client.download_output(job_uuid)?;
                let message = format!(
                    "output for job {job_uuid} written to {} ({} bytes, sha256 {})",
                    archive.path.display(),
                    archive.bytes,
                    archive.sha256
                );
                self.client.reporter().step(&message);
                self.archive = Some(archive);
            } else {
                let message = format!("job {job_uuid} produced no output");
                self.client.reporter().step(&message);
            }
        }
        Ok(true)
    }
}

/// Requests cancellation whenever the job is seen running. Never stops the
/// monitor by itself.
pub struct CancelOnRunning<'c, 'a> {
    client: &'c PlatformClient<'a>,
    attempts: u32,
}

impl<'c, 'a> CancelOnRunning<'c, 'a> {
    #[must_use]
    pub fn new(client: &'c PlatformClient<'a>) -> Self {
        Self {
            client,
            attempts: 0,
        }
    }

    /// How many cancellation requests have been sent.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl StatusHandler for CancelOnRunning<'_, '_> {
    fn handle(&mut self, status: &JobStatus, job_uuid: &str) -> Result<bool> {
        if *status == JobStatus::Running {
            self.attempts += 1;
            let result = self.client.cancel_job(job_uuid)?;
            if !result.is_success() {
                let message =
                    format!("cancel request for job {job_uuid} returned status '{result}'");
                self.client.reporter().warn(&message);
            }
        }
        Ok(false)
    }
}
