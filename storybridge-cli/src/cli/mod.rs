//! # Command Line Interface
//!
//! Defines the CLI structure and dispatches to the command handlers.

mod connect;
mod export;
mod stories;

use anyhow::{Result, anyhow};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Args, Parser, Subcommand};
use storybridge_core::output::{format_status_code, print_info};
use storybridge_core::ColorMode;
use storybridge_jira::ApiError;

/// Top-level CLI command for storybridge
#[derive(Parser)]
#[command(name = "storybridge")]
#[command(about = "Turn Jira stories into test-case generation input")]
#[command(
  long_about = "Storybridge checks Jira credentials, lists user stories as normalized records\n\
        and exports generated test cases as JSON, CSV or XLSX.\n\n\
        The API token is read from JIRA_API_TOKEN. The base URL and email come from\n\
        flags, JIRA_BASE_URL / JIRA_EMAIL, or the settings file, in that order."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for storybridge
#[derive(Subcommand)]
pub enum Commands {
  /// Check Jira credentials against the current-user endpoint
  #[command(long_about = "Validate the Jira connection parameters and confirm them with a single\n\
            request to the current-user endpoint. Nothing is sent when validation fails.")]
  Connect(connect::ConnectArgs),

  /// List Jira stories as normalized records
  #[command(long_about = "Fetch issues of type Story, newest first, optionally scoped to one project.\n\n\
            One page of results is requested unless --max-results exceeds --page-size,\n\
            in which case further pages are followed until the cap is reached.")]
  #[command(alias = "ls")]
  Stories(stories::StoriesArgs),

  /// Export generated test cases to JSON, CSV or XLSX
  #[command(long_about = "Read a generation response (JSON with cases, promptTokens and\n\
            completionTokens) and write it as test-cases.json, test-cases.csv or\n\
            test-cases.xlsx in the output directory.")]
  Export(export::ExportArgs),
}

/// Connection overrides shared by the Jira commands
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
  /// Jira base URL, e.g. https://company.atlassian.net
  #[arg(long, value_name = "URL")]
  pub base_url: Option<String>,

  /// Account email used with the API token
  #[arg(long, value_name = "EMAIL")]
  pub email: Option<String>,
}

/// Handles the CLI command
pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  match cli.command {
    Commands::Connect(args) => connect::handle_connect_command(args),
    Commands::Stories(args) => stories::handle_stories_command(args),
    Commands::Export(args) => export::handle_export_command(args),
  }
}

/// Print a structured failure and turn it into the command's error.
///
/// In JSON mode the error envelope goes to stdout so scripts can parse it.
pub(crate) fn report_failure(err: &ApiError, json: bool) -> anyhow::Error {
  if json {
    if let Ok(text) = serde_json::to_string_pretty(err) {
      println!("{text}");
    }
  } else if let Some(details) = &err.details {
    print_info(&format!("Jira responded {} with: {details}", format_status_code(err.code)));
  }
  anyhow!("{} (code {})", err.error, err.code)
}
