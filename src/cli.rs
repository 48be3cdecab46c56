//! Command line interface.
//!
//! `xrayctl <PROPERTIES> <COMMAND>` loads the properties file, builds the
//! API client and runs one command. Each command collects its inputs
//! through interactive prompts and prints the JSON response.

use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ApiError, ExportOptions, JunitImportOptions, XrayClient};
use crate::config::Properties;
use crate::error::{AppError, Result};
use crate::prompt::Prompter;

/// Top-level CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "xrayctl")]
#[command(about = "Command line client for the JIRA and Xray REST APIs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Xray properties file (JSON with host, username and password)
    #[arg(value_name = "PROPERTIES")]
    pub properties: PathBuf,

    /// Xray command: junit, json, jql, issue, project or export
    #[arg(value_name = "COMMAND")]
    pub command: String,

    /// Sets the level of verbosity (-v for INFO, -vv for DEBUG)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Log at DEBUG level (same as -vv)
    #[arg(long)]
    pub very_verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// The effective `-v` count, with `--very-verbose` counting as two.
    pub fn verbosity(&self) -> u8 {
        if self.very_verbose {
            self.verbose.max(2)
        } else {
            self.verbose
        }
    }
}

/// The commands understood by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Import a JUnit XML report.
    Junit,
    /// Import results in the Xray JSON format.
    Json,
    /// Run a JQL search.
    Jql,
    /// Show an issue.
    Issue,
    /// Show a project.
    Project,
    /// Export test run results.
    Export,
}

impl Command {
    /// Parse a command name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "junit" => Some(Command::Junit),
            "json" => Some(Command::Json),
            "jql" => Some(Command::Jql),
            "issue" => Some(Command::Issue),
            "project" => Some(Command::Project),
            "export" => Some(Command::Export),
            _ => None,
        }
    }
}

/// Run the CLI: load properties, build the client, dispatch the command and
/// print the response to `out`.
pub async fn run(cli: &Cli, prompter: &mut dyn Prompter, out: &mut dyn Write) -> Result<()> {
    debug!("Starting xrayctl");
    let properties = Properties::load(&cli.properties)?;
    let client = XrayClient::new(&properties)?;

    let command = Command::from_name(&cli.command).ok_or_else(|| {
        warn!(command = %cli.command, "Unknown command");
        AppError::input(format!("unknown command '{}'", cli.command))
    })?;

    let response = dispatch(&client, command, prompter).await?;

    serde_json::to_writer_pretty(&mut *out, &response).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

/// Prompt for a command's inputs and call the matching client operation.
pub async fn dispatch(
    client: &XrayClient,
    command: Command,
    prompter: &mut dyn Prompter,
) -> Result<Value> {
    let response = match command {
        Command::Junit => {
            let report = prompter.ask("JUnit XML report")?;
            let project_key = prompter.ask("Project Key")?;
            let options = JunitImportOptions {
                test_plan_key: prompter.ask_optional("Test Plan Key")?,
                test_environments: prompter.ask_optional("Test Environments")?,
                revision: prompter.ask_optional("Revision")?,
                fix_version: prompter.ask_optional("Fix Version")?,
            };
            client
                .import_junit_results(&PathBuf::from(report.trim()), project_key.trim(), &options)
                .await?
        }
        Command::Json => {
            let path = PathBuf::from(prompter.ask("JSON results file")?.trim());
            let content = std::fs::read_to_string(&path).map_err(|source| ApiError::File {
                path: path.clone(),
                source,
            })?;
            let results: Value = serde_json::from_str(&content).map_err(|e| {
                AppError::input(format!("'{}' is not valid JSON: {}", path.display(), e))
            })?;
            client.import_json_results(&results).await?
        }
        Command::Jql => {
            let jql = prompter.ask("JQL Query")?;
            client.run_jql_query(jql.trim()).await?
        }
        Command::Issue => {
            let issue = prompter.ask("Issue Key")?;
            client.get_issue_info(issue.trim()).await?
        }
        Command::Project => {
            let project = prompter.ask("Project Key")?;
            client.get_project_info(project.trim()).await?
        }
        Command::Export => {
            let options = ExportOptions {
                test_execution_key: prompter.ask_optional("Test Execution Key")?,
                test_key: prompter.ask_optional("Test Key")?,
                test_plan_key: prompter.ask_optional("Test Plan Key")?,
                saved_filter_id: prompter.ask_optional("Saved Filter ID")?,
            };
            let selector = options.selector()?;
            client.export_results(&selector).await?
        }
    };

    Ok(response)
}
