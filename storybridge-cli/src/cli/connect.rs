//! # Connect Command
//!
//! Validates the connection parameters and confirms them against Jira.

use anyhow::Result;
use clap::Args;
use storybridge_core::output::{emphasize, format_url, print_info, print_success};
use storybridge_jira::{ApiError, Connected};

use super::{ConnectionArgs, report_failure};
use crate::clients;

/// Arguments for the connect command
#[derive(Args)]
pub struct ConnectArgs {
  #[command(flatten)]
  pub connection: ConnectionArgs,

  /// Print the result as JSON
  #[arg(long)]
  pub json: bool,
}

/// Handle the connect command
pub fn handle_connect_command(args: ConnectArgs) -> Result<()> {
  let settings = clients::load_settings()?;
  let config = match clients::resolve_connection(&settings.jira, &args.connection) {
    Ok(config) => config,
    Err(err) => return Err(report_failure(&ApiError::for_connect(err.into()), args.json)),
  };

  let (rt, client) = clients::create_jira_runtime_and_client(&settings.jira)?;
  print_info(&format!("Connecting to {}", format_url(config.base_url())));

  match rt.block_on(client.validate_credentials(&config)) {
    Ok(connected) => {
      if args.json {
        println!("{}", serde_json::to_string_pretty(&connected)?);
      } else {
        print_success(&describe_connection(&connected, config.account()));
      }
      Ok(())
    }
    Err(err) => Err(report_failure(&ApiError::for_connect(err), args.json)),
  }
}

fn describe_connection(connected: &Connected, account: &str) -> String {
  let who = connected
    .identity
    .display_name()
    .or_else(|| connected.identity.email_address())
    .unwrap_or(account);
  format!("Connected to Jira as {}", emphasize(who))
}
