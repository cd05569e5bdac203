//! Diagnostic logging setup.
//!
//! Log events go to stderr so stdout stays clean for progress lines and
//! `--json` documents. `JOBPROBE_LOG` takes an `EnvFilter` directive;
//! `JOBPROBE_LOG_FORMAT=json` switches to one JSON object per event.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "JOBPROBE_LOG";
pub const LOG_FORMAT_ENV: &str = "JOBPROBE_LOG_FORMAT";

/// Filter used when `JOBPROBE_LOG` is unset.
#[must_use]
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "jobprobe_cli=debug,info" } else { "warn" }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
