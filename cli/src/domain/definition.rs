//! Application and job definition documents.
//!
//! Definitions are kept as raw JSON text: the harness only reads the few
//! identifying fields it needs and otherwise forwards the document verbatim.

use std::sync::LazyLock;

use jobprobe_common::{pointers, validate_path_segment};
use regex::Regex;
use serde_json::Value;

use crate::domain::error::DefinitionError;

/// Placeholder substituted with the session's resource id.
pub const RESOURCE_PLACEHOLDER: &str = "EXEC_SYSTEM_ID";

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // literal pattern
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder pattern")
});

/// A registered, versioned application template. Identity is `(id, version)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDefinition {
    pub id: String,
    pub version: String,
    pub raw: String,
}

impl AppDefinition {
    /// Parse an application definition and validate its identity fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not JSON, lacks `id`/`version`,
    /// or either cannot be used as a path segment.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DefinitionError> {
        let raw = raw.into();
        let root: Value = serde_json::from_str(&raw)?;
        let id = required_text(&root, pointers::DEFINITION_ID, "id")?;
        let version = required_text(&root, pointers::DEFINITION_VERSION, "version")?;
        validate_identifier("id", &id)?;
        validate_identifier("version", &version)?;
        Ok(Self { id, version, raw })
    }

    /// Parse `template` after substituting the resource placeholder.
    ///
    /// # Errors
    ///
    /// Returns an error if the template references the placeholder while
    /// `resource_id` is empty, or if the rendered document is invalid.
    pub fn render(template: &str, resource_id: &str) -> Result<Self, DefinitionError> {
        Self::parse(substitute_resource_id(template, resource_id)?)
    }

    /// Prefix for this application's diagnostic files: `{id}_{version}`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.id, self.version)
    }
}

/// A job submission request. The uuid is assigned by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefinition {
    pub name: String,
    pub raw: String,
}

impl JobDefinition {
    /// # Errors
    ///
    /// Returns an error if the document is not JSON or has no `name`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DefinitionError> {
        let raw = raw.into();
        let root: Value = serde_json::from_str(&raw)?;
        let name = required_text(&root, pointers::JOB_NAME, "name")?;
        Ok(Self { name, raw })
    }
}

/// Replace `${EXEC_SYSTEM_ID}` with `resource_id`.
///
/// # Errors
///
/// Returns [`DefinitionError::MissingResourceId`] when the placeholder is
/// present and `resource_id` is empty.
pub fn substitute_resource_id(
    template: &str,
    resource_id: &str,
) -> Result<String, DefinitionError> {
    let mut missing = false;
    let rendered = PLACEHOLDER_RE.replace_all(template, |caps: &regex::Captures<'_>| {
        if &caps[1] == RESOURCE_PLACEHOLDER {
            if resource_id.is_empty() {
                missing = true;
            }
            resource_id.to_string()
        } else {
            caps[0].to_string()
        }
    });
    if missing {
        return Err(DefinitionError::MissingResourceId {
            placeholder: RESOURCE_PLACEHOLDER,
        });
    }
    Ok(rendered.into_owned())
}

/// Names of `${...}` placeholders still present in `text`, in order of
/// first appearance.
#[must_use]
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// File name for a local diagnostic or artifact derived from remote
/// identifiers. Path separators are replaced so the file always lands in
/// the output directory.
#[must_use]
pub fn local_file_name(stem: &str, suffix: &str) -> String {
    let safe: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let safe = if safe.is_empty() || safe.chars().all(|c| c == '.') {
        "unnamed".to_string()
    } else {
        safe
    };
    format!("{safe}_{suffix}")
}

fn required_text(
    root: &Value,
    pointer: &str,
    field: &'static str,
) -> Result<String, DefinitionError> {
    root.pointer(pointer)
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .ok_or(DefinitionError::MissingField { field })
}

fn validate_identifier(field: &'static str, value: &str) -> Result<(), DefinitionError> {
    validate_path_segment(value).map_err(|reason| DefinitionError::InvalidIdentifier {
        field,
        value: value.to_string(),
        reason,
    })
}
