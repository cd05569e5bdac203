//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, ConnectionFlags, OutputFlags, OutputMode, SettingsFlags};
use crate::commands;
use crate::domain::session::DEFAULT_BASE_URL;

/// End-to-end verification of a batch platform's application and job lifecycle
#[derive(Parser)]
#[command(
    name = "jobprobe",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the platform is and who to log in as.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Platform base URL
    #[arg(
        long,
        global = true,
        env = "TAPIS_URL_BASE",
        default_value = DEFAULT_BASE_URL
    )]
    pub base_url: String,

    /// Execution system substituted for ${EXEC_SYSTEM_ID} in app definitions
    #[arg(long, global = true, env = "TAPIS_EXEC_SYSTEM_ID")]
    pub resource_id: Option<String>,

    /// Platform username
    #[arg(long, global = true, env = "TAPIS_USERNAME")]
    pub username: Option<String>,

    /// Platform password
    #[arg(long, global = true, env = "TAPIS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Local behaviour: output location, polling, definition source.
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Directory for diagnostic files and downloaded archives [default: .]
    #[arg(long, global = true, env = "JOBPROBE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Wait between status checks, e.g. "5s"
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub poll_interval: Option<Duration>,

    /// Give up polling a job after this long, e.g. "30m"
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub poll_timeout: Option<Duration>,

    /// Settings file [default: ~/.jobprobe/config.yaml]
    #[arg(long, global = true, env = "JOBPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read definitions from this directory instead of the built-in set
    #[arg(long, global = true)]
    pub resources: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the verification suite
    Run(commands::run::RunArgs),

    /// Register an application definition
    Register(commands::register::RegisterArgs),

    /// Submit a job and wait for it to stop
    Submit(commands::submit::SubmitArgs),

    /// Soft-delete or restore an application
    #[command(subcommand)]
    App(commands::app::AppCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings are invalid or the command fails.
    pub fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose,
            connection,
            settings,
            command,
        } = self;

        if let Command::Version = command {
            let mode = if json { OutputMode::Json } else { OutputMode::Human };
            return commands::version::run(mode);
        }

        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            connection: ConnectionFlags {
                base_url: connection.base_url,
                resource_id: connection.resource_id,
                username: connection.username,
                password: connection.password,
            },
            settings: SettingsFlags {
                output_dir: settings.output_dir,
                poll_interval: settings.poll_interval,
                poll_timeout: settings.poll_timeout,
                config: settings.config,
                resources: settings.resources,
            },
            verbose,
        };
        let ctx = AppContext::new(&flags)?;

        match command {
            Command::Run(args) => commands::run::run(&ctx, &args),
            Command::Register(args) => commands::register::run(&ctx, &args),
            Command::Submit(args) => commands::submit::run(&ctx, &args),
            Command::App(cmd) => commands::app::run(&ctx, &cmd),
            Command::Version => Ok(()),
        }
    }
}
