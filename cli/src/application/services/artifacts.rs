//! Application service — job output listing and download.
//!
//! A stateless query-then-stream pair: no status semantics of its own.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use jobprobe_common::{paths, pointers};
use sha2::{Digest, Sha256};

use crate::application::ports::{ApiRequest, HttpMethod};
use crate::application::services::platform::{PlatformClient, checked_segment};
use crate::domain::definition::local_file_name;

/// Read/write chunk size for archive downloads.
pub const DOWNLOAD_CHUNK: usize = 8 * 1024;

/// A job output archive saved locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArchive {
    pub path: PathBuf,
    pub bytes: u64,
    pub sha256: String,
}

impl PlatformClient<'_> {
    /// Number of output records for a job.
    ///
    /// A logically rejected listing counts as no output, so a listing quirk
    /// never aborts a scenario.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a malformed response.
    pub fn output_count(&self, uuid: &str) -> Result<u64> {
        checked_segment("job uuid", uuid)?;
        let envelope = self.call(
            HttpMethod::Get,
            &paths::job_output_list(uuid),
            &self.session().auth_headers(),
            None,
        )?;
        if !envelope.is_success() {
            tracing::debug!(job = uuid, status = %envelope.status(), "output listing rejected");
            return Ok(0);
        }
        Ok(envelope.count_at(pointers::RECORD_COUNT).unwrap_or(0))
    }

    /// Stream a job's output as a zip archive to `{uuid}_output.zip`.
    ///
    /// The archive only appears under that name once fully received; a
    /// download that fails midway leaves no file behind.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport or local write failure.
    pub fn download_output(&self, uuid: &str) -> Result<DownloadedArchive> {
        checked_segment("job uuid", uuid)?;
        let path = paths::job_output_download(uuid);
        let headers = self.session().auth_headers();
        let mut reader = self
            .transport()
            .request_stream(&ApiRequest {
                method: HttpMethod::Get,
                path: &path,
                headers: &headers,
                body: None,
            })
            .with_context(|| format!("downloading output for job {uuid}"))?;

        let name = local_file_name(uuid, "output.zip");
        let mut writer = self.artifacts().create_artifact(&name)?;

        let mut hasher = Sha256::new();
        let mut bytes = 0u64;
        let mut buf = vec![0u8; DOWNLOAD_CHUNK];
        loop {
            let n = reader.read(&mut buf).context("reading output archive")?;
            if n == 0 {
                break;
            }
            writer
                .write_all(&buf[..n])
                .with_context(|| format!("writing {name}"))?;
            hasher.update(&buf[..n]);
            bytes += n as u64;
        }
        let local = writer.commit()?;

        let archive = DownloadedArchive {
            path: local,
            bytes,
            sha256: format!("{:x}", hasher.finalize()),
        };
        tracing::info!(
            job = uuid,
            file = %archive.path.display(),
            bytes = archive.bytes,
            sha256 = %archive.sha256,
            "output archive saved"
        );
        Ok(archive)
    }
}
