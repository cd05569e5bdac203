//! `jobprobe version`

use anyhow::Result;

use crate::app::OutputMode;
use crate::output::json::print_document;

/// Print the harness version.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(mode: OutputMode) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    match mode {
        OutputMode::Json => print_document(&serde_json::json!({ "version": version })),
        OutputMode::Human => {
            println!("jobprobe {version}");
            Ok(())
        }
    }
}
