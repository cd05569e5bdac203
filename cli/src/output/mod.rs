//! Output formatting module

pub mod human;
pub mod json;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;

pub use human::HumanRenderer;
pub use reporter::{LogReporter, Progress, TerminalReporter};
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self { styles, quiet }
    }

    /// `"  ✓ {msg}"`.
    #[must_use]
    pub fn success_line(&self, msg: &str) -> String {
        format!("  {} {msg}", "✓".style(self.styles.success))
    }

    /// `"  ⚠ {msg}"`.
    #[must_use]
    pub fn warn_line(&self, msg: &str) -> String {
        format!("  {} {msg}", "⚠".style(self.styles.warning))
    }

    /// `"  ℹ {msg}"`.
    #[must_use]
    pub fn info_line(&self, msg: &str) -> String {
        format!("  {} {msg}", "ℹ".style(self.styles.info))
    }

    #[must_use]
    pub fn header_line(&self, msg: &str) -> String {
        format!("  {}", msg.style(self.styles.header))
    }

    /// Key dimmed, then the value.
    #[must_use]
    pub fn kv_line(&self, key: &str, value: &str) -> String {
        format!("  {}  {value}", key.style(self.styles.dim))
    }

    /// Print a prepared line. Suppressed when `quiet`.
    pub fn emit(&self, line: &str) {
        if !self.quiet {
            println!("{line}");
        }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        self.emit(&self.success_line(msg));
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        self.emit(&self.warn_line(msg));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        self.emit(&self.info_line(msg));
    }
}
