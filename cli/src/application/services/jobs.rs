//! Application service — job submission and the status monitor.
//!
//! The monitor never decides on its own that a job is done: after each
//! status check it runs the whole handler chain, and stops only when at
//! least one handler asks it to.

use anyhow::{Result, bail};
use jobprobe_common::{JobStatus, LogicalStatus, paths, pointers, validate_path_segment};

use crate::application::ports::HttpMethod;
use crate::application::services::artifacts::DownloadedArchive;
use crate::application::services::handlers::{CancelOnRunning, FinishAndCollect, StatusHandler};
use crate::application::services::platform::{PlatformClient, checked_segment};
use crate::domain::definition::local_file_name;
use crate::domain::{ApiOutcome, Envelope, Job, JobDefinition, PollError};

/// A job submitted and monitored until it stopped.
#[derive(Debug)]
pub struct JobRun {
    pub job: Job,
    pub archive: Option<DownloadedArchive>,
    pub cancel_attempts: u32,
}

impl PlatformClient<'_> {
    /// Submit a job definition.
    ///
    /// The full response is always written to `{id}_submit.json`, where `id`
    /// is the assigned uuid on success and the job's name otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or if the diagnostic file cannot
    /// be written.
    pub fn submit_job(&self, job: &JobDefinition) -> Result<ApiOutcome<String>> {
        let envelope = self.call(
            HttpMethod::Post,
            paths::JOB_SUBMIT,
            &self.session().json_headers(),
            Some(&job.raw),
        )?;
        let outcome = envelope.outcome(|e| {
            e.text_at(pointers::JOB_UUID)
                .filter(|uuid| validate_path_segment(uuid).is_ok())
                .map(str::to_owned)
        });
        let id = match &outcome {
            ApiOutcome::Success(uuid) => uuid.as_str(),
            ApiOutcome::Rejected(_) => job.name.as_str(),
        };
        let path = self.persist(&local_file_name(id, "submit.json"), envelope.raw())?;
        let message = format!(
            "submitted job {id}, status is {}, response written to {}",
            outcome.status(),
            path.display()
        );
        self.reporter().step(&message);
        Ok(outcome)
    }

    /// Ask the platform to cancel a job.
    ///
    /// Non-success statuses are written to `{uuid}_cancel.json`; the logical
    /// status is returned either way.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or if the diagnostic file cannot
    /// be written.
    pub fn cancel_job(&self, uuid: &str) -> Result<LogicalStatus> {
        checked_segment("job uuid", uuid)?;
        let envelope = self.call(
            HttpMethod::Post,
            &paths::job_cancel(uuid),
            &self.session().auth_headers(),
            None,
        )?;
        let status = envelope.status();
        let message = format!("cancelled job {uuid}, status is {status}");
        self.reporter().step(&message);
        if !status.is_success() {
            let path = self.persist(&local_file_name(uuid, "cancel.json"), envelope.raw())?;
            let message = format!("response written to {}", path.display());
            self.reporter().warn(&message);
        }
        Ok(status)
    }

    /// Fetch the current status of a job as reported by the platform.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a malformed response.
    pub fn fetch_job_status(&self, uuid: &str) -> Result<(JobStatus, Envelope)> {
        checked_segment("job uuid", uuid)?;
        let envelope = self.call(
            HttpMethod::Get,
            &paths::job_status(uuid),
            &self.session().auth_headers(),
            None,
        )?;
        let status = JobStatus::from(envelope.text_at(pointers::JOB_STATUS).unwrap_or_default());
        Ok((status, envelope))
    }

    /// Poll a job until a handler asks to stop, and return the last status.
    ///
    /// Each tick waits the poll interval, fetches the status, then invokes
    /// every handler in order with it, even after one has asked to stop. When
    /// any did, the status response is written to `{uuid}_status.json` and the
    /// status returned. Without a configured timeout the loop is unbounded.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the status call or by a handler, or
    /// `PollError::TimedOut` once a configured timeout has elapsed.
    pub fn wait_for_status(
        &self,
        uuid: &str,
        handlers: &mut [&mut dyn StatusHandler],
    ) -> Result<JobStatus> {
        checked_segment("job uuid", uuid)?;
        let poll = self.poll_settings();
        let started = self.clock().now();
        let message = format!("waiting for status for job {uuid}...");
        self.reporter().step(&message);

        loop {
            self.clock().sleep(poll.interval);

            let (status, envelope) = self.fetch_job_status(uuid)?;
            tracing::debug!(job = uuid, %status, "status observed");
            self.reporter().step(&format!("status is {status}"));

            let mut terminate = false;
            for handler in handlers.iter_mut() {
                if handler.handle(&status, uuid)? {
                    terminate = true;
                }
            }

            if terminate {
                let path = self.persist(&local_file_name(uuid, "status.json"), envelope.raw())?;
                let message = format!(
                    "finished waiting for status for job {uuid}, response written to {}",
                    path.display()
                );
                self.reporter().success(&message);
                return Ok(status);
            }

            if let Some(limit) = poll.timeout {
                let elapsed = self.clock().now().saturating_duration_since(started);
                if elapsed >= limit {
                    return Err(PollError::TimedOut {
                        uuid: uuid.to_string(),
                        last: status.to_string(),
                        elapsed,
                    }
                    .into());
                }
            }
        }
    }

    /// Submit `definition` and monitor it with the standard handler chain:
    /// finish-and-collect, preceded by cancel-on-running when requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission is rejected or the monitor fails.
    pub fn run_job(&self, definition: &JobDefinition, cancel_on_running: bool) -> Result<JobRun> {
        let mut job = Job::new(definition.name.as_str());
        let uuid = match self.submit_job(definition)? {
            ApiOutcome::Success(uuid) => uuid,
            ApiOutcome::Rejected(status) if status.is_success() => {
                bail!(
                    "submission of job {} succeeded without a valid job uuid",
                    definition.name
                )
            }
            ApiOutcome::Rejected(status) => {
                bail!(
                    "submission of job {} rejected with status '{status}'",
                    definition.name
                )
            }
        };
        job.assign_uuid(uuid.as_str());

        let mut cancel = CancelOnRunning::new(self);
        let mut collect = FinishAndCollect::new(self);
        let mut chain: Vec<&mut dyn StatusHandler> = Vec::with_capacity(2);
        if cancel_on_running {
            chain.push(&mut cancel);
        }
        chain.push(&mut collect);

        let status = self.wait_for_status(&uuid, &mut chain)?;
        drop(chain);
        job.observe(status);
        Ok(JobRun {
            job,
            archive: collect.archive().cloned(),
            cancel_attempts: cancel.attempts(),
        })
    }
}
