//! xrayctl - command line client for JIRA and Xray.
//!
//! Runs on a single-threaded runtime: every command performs its requests
//! one after another.

use std::process::ExitCode;

use clap::Parser;
use xrayctl::cli::{self, Cli};
use xrayctl::logging::{self, LogConfig};
use xrayctl::prompt::TerminalPrompter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let log_config = LogConfig::from_verbosity(args.verbosity()).with_log_file(args.log_file.clone());
    if let Err(e) = logging::init(&log_config) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    let mut stdout = std::io::stdout().lock();
    match cli::run(&args, &mut TerminalPrompter, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e.user_message());
            if let Some(action) = e.suggested_action() {
                eprintln!("{}", action);
            }
            ExitCode::from(e.exit_code())
        }
    }
}
