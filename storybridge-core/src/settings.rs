//! # Settings
//!
//! Loads storybridge settings from `config.toml` in the platform config
//! directory and layers environment overrides on top. API tokens are never
//! written to or read from the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::consts::{ENV_CONFIG_DIR, ENV_JIRA_BASE_URL, ENV_JIRA_EMAIL, SETTINGS_FILE_NAME};

/// Represents the configuration directory for storybridge
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Resolve the config directory, honouring `STORYBRIDGE_CONFIG_DIR`
  pub fn new() -> Result<Self> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR)
      && !dir.is_empty()
    {
      return Ok(Self {
        config_dir: PathBuf::from(dir),
      });
    }

    let proj_dirs =
      ProjectDirs::from("dev", "storybridge", "storybridge").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the path to the settings file
  pub fn settings_path(&self) -> PathBuf {
    self.config_dir.join(SETTINGS_FILE_NAME)
  }

  /// Load settings from the settings file or return defaults
  pub fn load_settings(&self) -> Result<Settings> {
    Settings::load_from(&self.settings_path())
  }

  /// Save settings to the settings file
  pub fn save_settings(&self, settings: &Settings) -> Result<()> {
    settings.save_to(&self.settings_path())
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

/// Jira connection and search settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraSettings {
  /// Jira base URL, e.g. `https://company.atlassian.net`
  pub base_url: Option<String>,
  /// Account email used for Basic authentication
  pub email: Option<String>,
  /// Custom field holding acceptance criteria, e.g. `customfield_10042`
  pub acceptance_criteria_field: Option<String>,
  /// Request timeout in seconds
  pub timeout_secs: u64,
  /// Issues requested per search call
  pub page_size: u32,
  /// Cumulative cap on fetched issues
  pub max_results: u32,
}

impl Default for JiraSettings {
  fn default() -> Self {
    Self {
      base_url: None,
      email: None,
      acceptance_criteria_field: None,
      timeout_secs: 30,
      page_size: 50,
      max_results: 50,
    }
  }
}

/// All storybridge settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub jira: JiraSettings,
}

impl Settings {
  /// Load settings from `path`, or defaults when the file does not exist
  pub fn load_from(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings: Self =
      toml::from_str(&content).with_context(|| format!("Failed to parse settings from {}", path.display()))?;

    Ok(settings)
  }

  /// Write settings to `path`, creating the parent directory if needed
  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;
    fs::write(path, content).with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
  }

  /// Override file values with `JIRA_BASE_URL` and `JIRA_EMAIL` when set
  pub fn apply_env(mut self) -> Self {
    if let Some(base_url) = non_empty_env(ENV_JIRA_BASE_URL) {
      self.jira.base_url = Some(base_url);
    }
    if let Some(email) = non_empty_env(ENV_JIRA_EMAIL) {
      self.jira.email = Some(email);
    }
    self
  }
}

fn non_empty_env(name: &str) -> Option<String> {
  std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
