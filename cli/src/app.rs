//! Application context — unified state passed to every command handler.
//!
//! `AppContext` resolves flags, environment, and the settings file once and
//! owns the production adapters (HTTP transport, output directory, clock,
//! definition source). Commands borrow them to build a `PlatformClient`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{DefinitionSource, ProgressReporter};
use crate::application::services::PlatformClient;
use crate::application::services::auth::establish_session;
use crate::domain::{Credentials, PollSettings, Session, SettingsError};
use crate::infra::clock::SystemClock;
use crate::infra::config::{YamlSettingsStore, default_settings_path};
use crate::infra::fs::LocalFs;
use crate::infra::http::UreqTransport;
use crate::infra::resources::{DirectoryDefinitions, EmbeddedDefinitions};
use crate::output::reporter::{LogReporter, TerminalReporter};
use crate::output::{HumanRenderer, OutputContext};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Platform location and login.
pub struct ConnectionFlags {
    pub base_url: String,
    pub resource_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Local overrides on top of the settings file.
pub struct SettingsFlags {
    pub output_dir: Option<PathBuf>,
    pub poll_interval: Option<Duration>,
    pub poll_timeout: Option<Duration>,
    pub config: Option<PathBuf>,
    pub resources: Option<PathBuf>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub connection: ConnectionFlags,
    pub settings: SettingsFlags,
    pub verbose: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Resolved polling behaviour.
    pub poll: PollSettings,
    base_url: String,
    resource_id: String,
    credentials: Option<Credentials>,
    transport: UreqTransport,
    artifacts: LocalFs,
    clock: SystemClock,
    definitions: Box<dyn DefinitionSource>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or the resolved
    /// poll settings are invalid.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let settings_path = match &flags.settings.config {
            Some(path) => path.clone(),
            None => default_settings_path()?,
        };
        let file = YamlSettingsStore::new(settings_path).load()?;

        let poll = file
            .poll
            .overridden(flags.settings.poll_interval, flags.settings.poll_timeout);
        poll.validate()?;

        let output_dir = flags
            .settings
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        let definitions: Box<dyn DefinitionSource> = match &flags.settings.resources {
            Some(dir) => Box::new(DirectoryDefinitions::new(dir.clone())),
            None => Box::new(EmbeddedDefinitions),
        };

        let credentials = match (&flags.connection.username, &flags.connection.password) {
            (Some(user), Some(pass)) if !user.is_empty() => {
                Some(Credentials::new(user.as_str(), pass.as_str()))
            }
            _ => None,
        };

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        tracing::debug!(
            base_url = %flags.connection.base_url,
            output_dir = %output_dir.display(),
            interval = ?poll.interval,
            timeout = ?poll.timeout,
            "settings resolved"
        );

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            poll,
            base_url: flags.connection.base_url.clone(),
            resource_id: flags.connection.resource_id.clone().unwrap_or_default(),
            credentials,
            transport: UreqTransport::new(flags.connection.base_url.as_str()),
            artifacts: LocalFs::new(output_dir),
            clock: SystemClock,
            definitions,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Human renderer over this context's output settings.
    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// Progress sink for services: the terminal, or the log in JSON mode.
    #[must_use]
    pub fn reporter(&self) -> Box<dyn ProgressReporter + '_> {
        match self.mode {
            OutputMode::Human => Box::new(TerminalReporter::new(&self.output)),
            OutputMode::Json => Box::new(LogReporter),
        }
    }

    /// Platform base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn definitions(&self) -> &dyn DefinitionSource {
        self.definitions.as_ref()
    }

    /// Exchange the configured credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::MissingCredentials` before any network call
    /// when username or password is absent, otherwise any token-exchange
    /// failure.
    pub fn establish_session(&self, reporter: &dyn ProgressReporter) -> Result<Session> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(SettingsError::MissingCredentials)?;
        establish_session(
            &self.transport,
            &self.artifacts,
            reporter,
            credentials,
            &self.base_url,
            &self.resource_id,
        )
    }

    /// A platform client over `session` using this context's adapters.
    #[must_use]
    pub fn client<'a>(
        &'a self,
        session: &'a Session,
        reporter: &'a dyn ProgressReporter,
    ) -> PlatformClient<'a> {
        PlatformClient::new(
            session,
            &self.transport,
            &self.artifacts,
            &self.clock,
            reporter,
        )
        .with_poll_settings(self.poll)
    }
}
