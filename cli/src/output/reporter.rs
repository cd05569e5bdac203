//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Kind of progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// `→`
    Step,
    /// `✓`
    Success,
    /// `!`
    Warn,
}

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// Every event is printed as `"  {marker} {message}"`, and nothing is
/// printed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// The line printed for an event, or `None` when quiet.
    #[must_use]
    pub fn line(&self, kind: Progress, message: &str) -> Option<String> {
        if self.ctx.quiet {
            return None;
        }
        let styles = &self.ctx.styles;
        let marker = match kind {
            Progress::Step => "→".style(styles.step).to_string(),
            Progress::Success => "✓".style(styles.success).to_string(),
            Progress::Warn => "!".style(styles.warning).to_string(),
        };
        Some(format!("  {marker} {message}"))
    }

    fn print(&self, kind: Progress, message: &str) {
        if let Some(line) = self.line(kind, message) {
            println!("{line}");
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.print(Progress::Step, message);
    }

    fn success(&self, message: &str) {
        self.print(Progress::Success, message);
    }

    fn warn(&self, message: &str) {
        self.print(Progress::Warn, message);
    }
}

/// Reporter used with `--json`: progress goes to the log only so stdout
/// carries nothing but the JSON document.
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn step(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn success(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}
