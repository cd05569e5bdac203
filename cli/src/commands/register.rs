//! `jobprobe register <definition>` — register one application.

use anyhow::{Result, bail};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::Registration;
use crate::commands::load_definition;
use crate::domain::AppDefinition;
use crate::output::json::{print_document, registration_document};

/// Arguments for the register command.
#[derive(Args)]
pub struct RegisterArgs {
    /// Definition file, or the name of a built-in definition (e.g. sleep_app.json)
    pub definition: String,

    /// Undelete the application instead of failing when it already exists
    #[arg(long)]
    pub recover: bool,
}

/// Entry point for `jobprobe register`.
///
/// # Errors
///
/// Returns an error if the definition cannot be read, the call fails, or the
/// platform does not report success.
pub fn run(ctx: &AppContext, args: &RegisterArgs) -> Result<()> {
    let template = load_definition(ctx, &args.definition)?;
    let reporter = ctx.reporter();
    let session = ctx.establish_session(&*reporter)?;
    let client = ctx.client(&session, &*reporter);

    let (id, status, recovered) = if args.recover {
        let (app, registration) = client.register_or_recover(&template)?;
        let recovered = matches!(registration, Registration::Recovered(_));
        (app.id, registration.status().clone(), recovered)
    } else {
        let app = AppDefinition::render(&template, session.resource_id())?;
        (app.id, client.register_app(&template)?, false)
    };

    if ctx.is_json() {
        print_document(&registration_document(&id, &status, recovered))?;
    }
    if !status.is_success() {
        bail!("registering app {id} returned status '{status}'");
    }
    if !ctx.is_json() {
        ctx.renderer().render_registration(&id, recovered);
    }
    Ok(())
}
