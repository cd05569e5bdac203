//! Definition documents — embedded in the binary or read from a directory.
//!
//! At compile time, `include_dir!` embeds everything under `resources/`:
//!   - `sleep_app.json`, `mpi_pi_app.json`      — application templates
//!   - `sleep_job.json`, `mpi_pi_job.json`      — jobs expected to finish
//!   - `sleep_cancel_job.json`                  — job cancelled while running
//!   - `sleep_fail_job.json`                    — job expected to fail

use std::path::PathBuf;

use anyhow::{Context, Result};
use include_dir::{Dir, include_dir};

use crate::application::ports::DefinitionSource;

static EMBEDDED_DEFINITIONS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/resources");

/// Definitions compiled into the binary.
pub struct EmbeddedDefinitions;

impl EmbeddedDefinitions {
    /// Names of every embedded definition, sorted.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = EMBEDDED_DEFINITIONS
            .files()
            .filter_map(|f| f.path().to_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl DefinitionSource for EmbeddedDefinitions {
    fn read_definition(&self, name: &str) -> Result<String> {
        let file = EMBEDDED_DEFINITIONS
            .get_file(name)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "embedded definition not found: {name} (available: {})",
                    Self::names().join(", ")
                )
            })?;
        file.contents_utf8()
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("embedded definition {name} is not UTF-8"))
    }
}

/// Definitions read from a directory on disk (`--resources <dir>`).
pub struct DirectoryDefinitions {
    root: PathBuf,
}

impl DirectoryDefinitions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DefinitionSource for DirectoryDefinitions {
    fn read_definition(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    }
}
