//! # Client Creation
//!
//! Builds the tokio runtime, the Jira client and validated connection
//! parameters from settings, environment and command-line flags.

use std::time::Duration;

use anyhow::{Context, Result};
use storybridge_core::consts::ENV_JIRA_API_TOKEN;
use storybridge_core::{JiraSettings, Settings, get_config_dirs};
use storybridge_jira::{ConnectionConfig, EnvCredential, JiraClient, ValidationError, create_jira_client};
use tokio::runtime::Runtime;

use crate::cli::ConnectionArgs;

/// Load settings from the config directory with environment overrides applied
pub fn load_settings() -> Result<Settings> {
  let config_dirs = get_config_dirs()?;
  let settings = config_dirs.load_settings()?;
  Ok(settings.apply_env())
}

/// Resolve connection parameters, preferring flags over settings.
///
/// The API token is always read from `JIRA_API_TOKEN`. A missing base URL
/// or email surfaces as the same validation error as an empty one.
pub fn resolve_connection(settings: &JiraSettings, args: &ConnectionArgs) -> Result<ConnectionConfig, ValidationError> {
  let base_url = args.base_url.as_deref().or(settings.base_url.as_deref()).unwrap_or_default();
  let email = args.email.as_deref().or(settings.email.as_deref()).unwrap_or_default();

  ConnectionConfig::from_source(base_url, email, &EnvCredential::new(ENV_JIRA_API_TOKEN))
}

/// Creates a tokio runtime and a Jira client using the configured timeout
pub fn create_jira_runtime_and_client(settings: &JiraSettings) -> Result<(Runtime, JiraClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client =
    create_jira_client(Duration::from_secs(settings.timeout_secs)).context("Failed to create Jira client")?;
  Ok((rt, client))
}
