//! Filesystem infrastructure — implements `LocalArtifactWriter` under an
//! output directory.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::application::ports::{LocalArtifactWriter, StagedArtifact};

/// Writes diagnostic files and downloaded archives under `root`.
///
/// Files are overwritten if they already exist. The directory is created on
/// first write.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target(&self, name: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("creating output directory {}", self.root.display()))?;
        Ok(self.root.join(name))
    }
}

impl LocalArtifactWriter for LocalFs {
    fn write_diagnostic(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.target(name)?;
        std::fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    fn create_artifact(&self, name: &str) -> Result<Box<dyn StagedArtifact>> {
        let target = self.target(name)?;
        let staged = tempfile::Builder::new()
            .prefix(&format!(".{name}."))
            .suffix(".part")
            .tempfile_in(&self.root)
            .with_context(|| format!("creating staging file for {}", target.display()))?;
        Ok(Box::new(StagedFile {
            target,
            file: BufWriter::new(staged),
        }))
    }
}

/// Artifact written to a hidden temporary file next to its target and
/// renamed into place on commit. The temporary file is removed on drop.
struct StagedFile {
    target: PathBuf,
    file: BufWriter<NamedTempFile>,
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl StagedArtifact for StagedFile {
    fn commit(self: Box<Self>) -> Result<PathBuf> {
        let Self { target, file } = *self;
        let staged = file
            .into_inner()
            .map_err(std::io::IntoInnerError::into_error)
            .with_context(|| format!("writing {}", target.display()))?;
        staged
            .persist(&target)
            .with_context(|| format!("saving {}", target.display()))?;
        Ok(target)
    }
}
