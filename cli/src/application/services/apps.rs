//! Application service — Application resource lifecycle.
//!
//! Register, query, and soft-delete versioned application definitions,
//! recovering from a conflicting stale record by undeleting it.

use anyhow::{Context, Result};
use jobprobe_common::{LogicalStatus, paths};

use crate::application::ports::{ApiRequest, HttpMethod};
use crate::application::services::platform::{PlatformClient, checked_segment};
use crate::domain::definition::{local_file_name, unresolved_placeholders};
use crate::domain::{AppDefinition, RequestFailure};

/// How a registration reached its final status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The platform accepted the definition as new.
    Created(LogicalStatus),
    /// The application already existed (409) and was undeleted instead.
    Recovered(LogicalStatus),
}

impl Registration {
    #[must_use]
    pub fn status(&self) -> &LogicalStatus {
        match self {
            Self::Created(status) | Self::Recovered(status) => status,
        }
    }
}

impl PlatformClient<'_> {
    /// Render `template` for this session and submit it as a new application.
    ///
    /// On logical success the canonical stored definition is fetched and
    /// written to `{id}_{version}_config.json`; otherwise the response is
    /// written to `{id}_{version}_create.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be rendered, on transport
    /// failure (a 409 surfaces as `RequestFailure`), or if a diagnostic file
    /// cannot be written.
    pub fn register_app(&self, template: &str) -> Result<LogicalStatus> {
        let app = AppDefinition::render(template, self.session().resource_id())?;
        for name in unresolved_placeholders(&app.raw) {
            let message = format!(
                "app {} still contains unresolved placeholder ${{{name}}}",
                app.id
            );
            self.reporter().warn(&message);
        }

        let envelope = self.call(
            HttpMethod::Post,
            paths::APPS,
            &self.session().json_headers(),
            Some(&app.raw),
        )?;
        let status = envelope.status();
        let message = format!(
            "created app {}, version {}, status is {status}",
            app.id, app.version
        );
        self.reporter().step(&message);

        if status.is_success() {
            let stored = self.fetch_app(&app.id, &app.version)?;
            let name = local_file_name(&app.file_stem(), "config.json");
            let path = self.persist(&name, &stored)?;
            let message = format!(
                "configuration for app {}, version {} written to {}",
                app.id,
                app.version,
                path.display()
            );
            self.reporter().step(&message);
        } else {
            let name = local_file_name(&app.file_stem(), "create.json");
            let path = self.persist(&name, envelope.raw())?;
            let message = format!("response written to {}", path.display());
            self.reporter().warn(&message);
        }
        Ok(status)
    }

    /// Fetch the stored definition of `id` at `version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifiers are not valid path segments or on
    /// transport failure.
    pub fn fetch_app(&self, id: &str, version: &str) -> Result<String> {
        checked_segment("app id", id)?;
        checked_segment("app version", version)?;
        let path = paths::app(id, version);
        let headers = self.session().auth_headers();
        self.transport()
            .request_text(&ApiRequest::get(&path, &headers))
            .with_context(|| format!("fetching app {id} version {version}"))
    }

    /// Mark an application deleted (`delete = true`) or active again.
    ///
    /// Non-success statuses are written to `{id}_{delete|undelete}.json`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or if the diagnostic file cannot
    /// be written.
    pub fn set_app_delete_state(&self, id: &str, delete: bool) -> Result<LogicalStatus> {
        checked_segment("app id", id)?;
        let action = paths::delete_action(delete);
        let envelope = self.call(
            HttpMethod::Post,
            &paths::app_delete_state(id, delete),
            &self.session().auth_headers(),
            None,
        )?;
        let status = envelope.status();
        let message = format!("{action}d app {id}, status is {status}");
        self.reporter().step(&message);
        if !status.is_success() {
            let name = local_file_name(id, &format!("{action}.json"));
            let path = self.persist(&name, envelope.raw())?;
            let message = format!("response written to {}", path.display());
            self.reporter().warn(&message);
        }
        Ok(status)
    }

    /// Register `template`, undeleting the application instead when the
    /// platform reports it already exists.
    ///
    /// # Errors
    ///
    /// Any failure other than a 409 on registration propagates unchanged, as
    /// does any failure of the undelete call.
    pub fn register_or_recover(&self, template: &str) -> Result<(AppDefinition, Registration)> {
        let app = AppDefinition::render(template, self.session().resource_id())?;
        match self.register_app(template) {
            Ok(status) => Ok((app, Registration::Created(status))),
            Err(err) if RequestFailure::find(&err).is_some_and(RequestFailure::is_conflict) => {
                tracing::info!(app = %app.id, "app already exists, undeleting");
                let message = format!("app {} already exists, undeleting", app.id);
                self.reporter().step(&message);
                let status = self.set_app_delete_state(&app.id, false)?;
                Ok((app, Registration::Recovered(status)))
            }
            Err(err) => Err(err),
        }
    }
}
