//! Command implementations

pub mod app;
pub mod register;
pub mod run;
pub mod submit;
pub mod version;

use std::path::Path;

use anyhow::{Context, Result};

use crate::app::AppContext;

/// Read a definition given on the command line: an existing file path, or
/// otherwise the name of a definition in the active source.
///
/// # Errors
///
/// Returns an error if neither the file nor the named definition exists.
pub fn load_definition(ctx: &AppContext, arg: &str) -> Result<String> {
    let path = Path::new(arg);
    if path.is_file() {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    ctx.definitions().read_definition(arg)
}
