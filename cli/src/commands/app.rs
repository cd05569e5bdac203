//! `jobprobe app delete|undelete <id>` — toggle an application's soft-delete flag.

use anyhow::{Result, bail};
use clap::Subcommand;

use crate::app::AppContext;
use crate::output::json::{app_state_document, print_document};

#[derive(Subcommand)]
pub enum AppCommand {
    /// Mark an application deleted
    Delete {
        /// Application id
        id: String,
    },
    /// Restore a deleted application
    Undelete {
        /// Application id
        id: String,
    },
}

/// Entry point for `jobprobe app`.
///
/// # Errors
///
/// Returns an error if the call fails or the platform does not report
/// success.
pub fn run(ctx: &AppContext, cmd: &AppCommand) -> Result<()> {
    let (id, delete) = match cmd {
        AppCommand::Delete { id } => (id.as_str(), true),
        AppCommand::Undelete { id } => (id.as_str(), false),
    };
    let reporter = ctx.reporter();
    let session = ctx.establish_session(&*reporter)?;
    let client = ctx.client(&session, &*reporter);

    let status = client.set_app_delete_state(id, delete)?;
    if ctx.is_json() {
        print_document(&app_state_document(id, delete, &status))?;
    }
    if !status.is_success() {
        bail!("app {id} returned status '{status}'");
    }
    if !ctx.is_json() {
        ctx.renderer().render_app_state(id, delete);
    }
    Ok(())
}
