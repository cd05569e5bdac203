//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::fmt;
use std::io::{Cursor, Read, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::domain::Headers;

// ── Value Types ───────────────────────────────────────────────────────────────

/// HTTP verbs the platform API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether requests with this verb carry a body (empty when none given).
    #[must_use]
    pub fn sends_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single platform API request. `path` is relative to the versioned base.
#[derive(Debug, Clone, Copy)]
pub struct ApiRequest<'a> {
    pub method: HttpMethod,
    pub path: &'a str,
    pub headers: &'a Headers,
    pub body: Option<&'a str>,
}

impl<'a> ApiRequest<'a> {
    #[must_use]
    pub fn get(path: &'a str, headers: &'a Headers) -> Self {
        Self {
            method: HttpMethod::Get,
            path,
            headers,
            body: None,
        }
    }

    #[must_use]
    pub fn post(path: &'a str, headers: &'a Headers, body: Option<&'a str>) -> Self {
        Self {
            method: HttpMethod::Post,
            path,
            headers,
            body,
        }
    }
}

/// How the caller wants the response body delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Text,
    Stream,
}

/// A successful response body in the requested shape.
pub enum Payload {
    Text(String),
    Stream(Box<dyn Read + Send>),
}

impl Payload {
    /// Body as text, draining a stream if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if a streamed body cannot be read or is not UTF-8.
    pub fn into_text(self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Stream(mut reader) => {
                let mut text = String::new();
                reader
                    .read_to_string(&mut text)
                    .context("reading response body")?;
                Ok(text)
            }
        }
    }

    /// Body as a byte stream.
    #[must_use]
    pub fn into_stream(self) -> Box<dyn Read + Send> {
        match self {
            Self::Text(text) => Box::new(Cursor::new(text.into_bytes())),
            Self::Stream(reader) => reader,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

// ── Transport Port ────────────────────────────────────────────────────────────

/// Issues one HTTP request against the platform API.
///
/// Implementations must fail with `crate::domain::RequestFailure` for any
/// response status of 300 or above, carrying the response body. They must
/// not retry.
pub trait Transport {
    /// Send `request` and deliver the body in `shape`.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailure` for status >= 300, or a transport error.
    fn request(&self, request: &ApiRequest<'_>, shape: ResponseShape) -> Result<Payload>;

    /// Send `request` and read the body as text.
    ///
    /// # Errors
    ///
    /// See [`Transport::request`].
    fn request_text(&self, request: &ApiRequest<'_>) -> Result<String> {
        self.request(request, ResponseShape::Text)?.into_text()
    }

    /// Send `request` and return the body as a byte stream.
    ///
    /// # Errors
    ///
    /// See [`Transport::request`].
    fn request_stream(&self, request: &ApiRequest<'_>) -> Result<Box<dyn Read + Send>> {
        Ok(self.request(request, ResponseShape::Stream)?.into_stream())
    }
}

// ── Local Artifact Port ───────────────────────────────────────────────────────

/// Abstracts writing diagnostic files and downloaded archives locally.
pub trait LocalArtifactWriter {
    /// Write a diagnostic document, replacing any previous file of that name.
    fn write_diagnostic(&self, name: &str, contents: &str) -> Result<PathBuf>;

    /// Open a binary artifact called `name` for writing.
    fn create_artifact(&self, name: &str) -> Result<Box<dyn StagedArtifact>>;
}

/// A binary artifact being written.
///
/// Nothing appears under the final name until `commit` succeeds. Dropping
/// an uncommitted artifact discards what was written.
pub trait StagedArtifact: Write {
    /// Flush and move the artifact to its final name, replacing any
    /// previous file, and return where it now lives.
    fn commit(self: Box<Self>) -> Result<PathBuf>;
}

// ── Definition Source Port ────────────────────────────────────────────────────

/// Abstracts where application and job definition documents come from.
pub trait DefinitionSource {
    /// Read the definition called `name` (e.g. `"sleep_app.json"`).
    fn read_definition(&self, name: &str) -> Result<String>;
}

// ── Clock Port ────────────────────────────────────────────────────────────────

/// Time source for the poll loop so tests can run without real waiting.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
