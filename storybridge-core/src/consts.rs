//! Environment variable names and file names shared across crates.

/// Environment variable storing the Jira base URL
pub const ENV_JIRA_BASE_URL: &str = "JIRA_BASE_URL";

/// Environment variable storing the Jira account email
pub const ENV_JIRA_EMAIL: &str = "JIRA_EMAIL";

/// Environment variable storing the Jira API token. The token is only ever
/// read from the environment, never from the settings file.
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";

/// Environment variable overriding the settings directory
pub const ENV_CONFIG_DIR: &str = "STORYBRIDGE_CONFIG_DIR";

/// Name of the settings file inside the config directory
pub const SETTINGS_FILE_NAME: &str = "config.toml";
