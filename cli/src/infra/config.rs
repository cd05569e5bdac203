//! Reads harness settings from a YAML file on disk.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::domain::config::HarnessSettings;

/// Location of the settings file when none is given: `~/.jobprobe/config.yaml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_settings_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".jobprobe").join("config.yaml"))
}

/// A YAML settings file. A missing file yields the defaults.
pub struct YamlSettingsStore {
    path: PathBuf,
}

impl YamlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<HarnessSettings> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(HarnessSettings::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", self.path.display()))
    }
}
