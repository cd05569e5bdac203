//! jobprobe - end-to-end lifecycle checks for a batch computing platform

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;

use jobprobe_cli::cli::Cli;
use jobprobe_cli::logging;
use jobprobe_cli::output::json::{error_code, format_error};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let json = cli.json;

    if let Err(e) = cli.run() {
        if json {
            match format_error(&format!("{e:#}"), error_code(&e)) {
                Ok(doc) => println!("{doc}"),
                Err(_) => eprintln!("Error: {e:#}"),
            }
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}
