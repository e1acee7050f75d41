use clap::Parser;
use depfetch_core::logging;

mod cli;

use crate::cli::{exit, Cli};

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        logging::init_logging_stderr();
    } else if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("log file unavailable, logging to stderr: {:#}", err);
    }

    match cli.run() {
        Ok(status) => std::process::exit(status.code()),
        Err(err) => {
            eprintln!("depfetch error: {:#}", err);
            std::process::exit(exit::error_code(&err));
        }
    }
}
