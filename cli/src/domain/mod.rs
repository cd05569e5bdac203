//! Domain layer — pure types, parsing, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod definition;
pub mod envelope;
pub mod error;
pub mod job;
pub mod report;
pub mod session;

pub use config::{HarnessSettings, PollSettings};
pub use definition::{AppDefinition, JobDefinition};
pub use envelope::{ApiOutcome, Envelope};
pub use error::{DefinitionError, EnvelopeError, PollError, RequestFailure, SettingsError};
pub use job::Job;
pub use report::{Outcome, Scenario, ScenarioResult, SuiteReport, TeardownResult};
pub use session::{Credentials, Headers, Session};
