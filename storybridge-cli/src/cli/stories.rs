//! # Stories Command
//!
//! Lists Jira stories as a table or as the JSON records consumed by test-case
//! generation.

use anyhow::Result;
use clap::{Args, ValueEnum};
use storybridge_core::{GenerateRequest, JiraSettings};
use storybridge_core::output::{emphasize, format_issue_key, print_header, print_info, print_warning, truncate_text};
use storybridge_jira::{AcceptanceCriteria, ApiError, FetchOptions, NormalizedIssueRecord, fetch_stories_with};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::debug;

use super::{ConnectionArgs, report_failure};
use crate::clients;

const DESCRIPTION_WIDTH: usize = 60;
const CRITERIA_WIDTH: usize = 40;

/// How stories are printed
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoriesFormat {
  /// Human-readable table
  #[default]
  Table,
  /// `{ "records": [...] }` as returned to callers
  Json,
  /// Test-case generation requests for stories with acceptance criteria
  Requests,
}

/// Arguments for the stories command
#[derive(Args)]
pub struct StoriesArgs {
  #[command(flatten)]
  pub connection: ConnectionArgs,

  /// Only list stories from this project (e.g. PROJ)
  #[arg(long, short = 'p', value_name = "KEY")]
  pub project: Option<String>,

  /// Issues requested per search call (1-100)
  #[arg(long, value_name = "N")]
  pub page_size: Option<u32>,

  /// Maximum number of stories to return
  #[arg(long, value_name = "N")]
  pub max_results: Option<u32>,

  /// Custom field holding acceptance criteria (e.g. customfield_10042)
  #[arg(long = "ac-field", value_name = "FIELD")]
  pub ac_field: Option<String>,

  /// Output format
  #[arg(long, value_enum, default_value_t = StoriesFormat::Table)]
  pub format: StoriesFormat,
}

#[derive(Tabled)]
struct StoryRow {
  #[tabled(rename = "Key")]
  key: String,
  #[tabled(rename = "Title")]
  title: String,
  #[tabled(rename = "Description")]
  description: String,
  #[tabled(rename = "Acceptance Criteria")]
  acceptance_criteria: String,
}

/// Handle the stories command
pub fn handle_stories_command(args: StoriesArgs) -> Result<()> {
  let json = args.format != StoriesFormat::Table;
  let settings = clients::load_settings()?;
  let config = match clients::resolve_connection(&settings.jira, &args.connection) {
    Ok(config) => config,
    Err(err) => return Err(report_failure(&ApiError::for_fetch(err.into()), json)),
  };
  let options = fetch_options(&settings.jira, &args);

  let (rt, client) = clients::create_jira_runtime_and_client(&settings.jira)?;
  let response = rt
    .block_on(fetch_stories_with(&client, &config, &options, args.project.as_deref()))
    .map_err(|err| report_failure(&err, json))?;

  match args.format {
    StoriesFormat::Json => {
      println!("{}", serde_json::to_string_pretty(&response)?);
      return Ok(());
    }
    StoriesFormat::Requests => {
      let (requests, skipped) = generate_requests(&response.records);
      if !skipped.is_empty() {
        print_warning(&format!("Skipped stories without acceptance criteria: {}", skipped.join(", ")));
      }
      println!("{}", serde_json::to_string_pretty(&requests)?);
      return Ok(());
    }
    StoriesFormat::Table => {}
  }

  if response.records.is_empty() {
    print_warning("No stories found.");
    return Ok(());
  }

  print_header("Jira stories");
  println!("{}", render_table(&response.records));
  print_info(&format!("{} stories", emphasize(&response.records.len().to_string())));
  Ok(())
}

/// Merge settings with command-line overrides
fn fetch_options(settings: &JiraSettings, args: &StoriesArgs) -> FetchOptions {
  FetchOptions {
    page_size: args.page_size.unwrap_or(settings.page_size),
    max_results: args.max_results.unwrap_or(settings.max_results),
    acceptance_criteria_field: args
      .ac_field
      .clone()
      .or_else(|| settings.acceptance_criteria_field.clone()),
  }
}

fn render_table(records: &[NormalizedIssueRecord]) -> String {
  let rows: Vec<StoryRow> = records
    .iter()
    .map(|record| StoryRow {
      key: format_issue_key(&record.id),
      title: record.title.clone(),
      description: truncate_text(&record.description, DESCRIPTION_WIDTH),
      acceptance_criteria: match &record.acceptance_criteria {
        AcceptanceCriteria::Available(text) => truncate_text(text, CRITERIA_WIDTH),
        AcceptanceCriteria::Unavailable => "-".to_string(),
      },
    })
    .collect();

  Table::new(rows).with(Style::sharp()).to_string()
}
