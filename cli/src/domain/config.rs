//! Domain types and validators for harness settings.
//!
//! Pure functions only — no I/O, no filesystem access.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::SettingsError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Default wait before each status check.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

// ── Settings schema ──────────────────────────────────────────────────────────

/// Settings stored in `~/.jobprobe/config.yaml`. Every field is optional in
/// the file; command-line flags override whatever the file sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessSettings {
    /// Status polling behaviour.
    pub poll: PollSettings,
    /// Directory for diagnostic files and downloaded archives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

/// How the job monitor polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Wait before each status check.
    #[serde(with = "humantime_serde_compat")]
    pub interval: Duration,
    /// Give up after this long. `None` polls until a handler stops the loop.
    #[serde(
        with = "humantime_serde_compat::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl PollSettings {
    /// Check the interval/timeout combination.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is zero or the timeout is shorter
    /// than one interval.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(SettingsError::ZeroInterval.into());
        }
        if let Some(timeout) = self.timeout
            && timeout < self.interval
        {
            return Err(SettingsError::TimeoutBelowInterval {
                timeout,
                interval: self.interval,
            }
            .into());
        }
        Ok(())
    }

    /// Apply command-line overrides on top of file settings.
    #[must_use]
    pub fn overridden(self, interval: Option<Duration>, timeout: Option<Duration>) -> Self {
        Self {
            interval: interval.unwrap_or(self.interval),
            timeout: timeout.or(self.timeout),
        }
    }
}

/// Human-readable durations (`"5s"`, `"10m"`) in the YAML file.
mod humantime_serde_compat {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use std::time::Duration;

        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(d) => super::serialize(d, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            let text: Option<String> = Option::deserialize(deserializer)?;
            text.map(|t| humantime::parse_duration(&t).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
