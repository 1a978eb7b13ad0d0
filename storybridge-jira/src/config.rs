//! # Connection Configuration
//!
//! Structural validation of Jira connection parameters. Nothing in this
//! module performs I/O; a config that leaves here is safe to build requests
//! from.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use url::Url;

use crate::auth::CredentialSource;
use crate::error::ValidationError;

static EMAIL_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex"));

/// Wire names of the connection fields
const FIELD_BASE_URL: &str = "baseUrl";
const FIELD_EMAIL: &str = "email";
const FIELD_API_KEY: &str = "apiKey";

/// Opaque credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  /// Access the raw value, only for building the authorization header
  pub fn expose(&self) -> &str {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Debug for Secret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Secret(***)")
  }
}

impl fmt::Display for Secret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}

/// Validated Jira connection parameters.
///
/// Built per call from caller input and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
  base_url: String,
  account: String,
  secret: Secret,
}

impl ConnectionConfig {
  /// Validate and normalize typed connection parameters.
  ///
  /// Checks run in field order and the first violation is returned.
  pub fn new(base_url: &str, account: &str, secret: Secret) -> Result<Self, ValidationError> {
    let base_url = check_base_url(base_url)?;
    let account = check_email(account)?;
    check_secret(&secret)?;

    Ok(Self {
      base_url,
      account,
      secret,
    })
  }

  /// Resolve the secret from a credential source, then validate.
  pub fn from_source(base_url: &str, account: &str, source: &dyn CredentialSource) -> Result<Self, ValidationError> {
    let base_url = check_base_url(base_url)?;
    let account = check_email(account)?;
    let secret = source.resolve()?;
    check_secret(&secret)?;

    Ok(Self {
      base_url,
      account,
      secret,
    })
  }

  /// Base URL with surrounding whitespace and one trailing slash removed
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Account identifier (email) used for Basic authentication
  pub fn account(&self) -> &str {
    &self.account
  }

  pub const fn secret(&self) -> &Secret {
    &self.secret
  }
}

/// Validated "fetch-stories" input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
  pub config: ConnectionConfig,
  /// Raw project key; checked when the query is built
  pub project_key: Option<String>,
}

/// Validate an arbitrary JSON value as connection parameters.
///
/// Expects an object with `baseUrl`, `email` and `apiKey` strings.
pub fn validate_connection_config(input: &Value) -> Result<ConnectionConfig, ValidationError> {
  let object = input
    .as_object()
    .ok_or_else(|| ValidationError::new("config", "expected an object"))?;

  let base_url = check_base_url(required_string(object, FIELD_BASE_URL)?)?;
  let account = check_email(required_string(object, FIELD_EMAIL)?)?;
  let secret = Secret::new(required_string(object, FIELD_API_KEY)?);
  check_secret(&secret)?;

  Ok(ConnectionConfig {
    base_url,
    account,
    secret,
  })
}

/// Validate the `{config, projectKey?}` shape accepted by "fetch-stories".
///
/// A `null` or blank `projectKey` is treated as absent.
pub fn validate_fetch_request(input: &Value) -> Result<FetchRequest, ValidationError> {
  let object = input
    .as_object()
    .ok_or_else(|| ValidationError::new("request", "expected an object"))?;

  let config = match object.get("config") {
    Some(config) => validate_connection_config(config)?,
    None => return Err(ValidationError::new("config", "is required")),
  };

  let project_key = match object.get("projectKey") {
    None | Some(Value::Null) => None,
    Some(Value::String(key)) if key.trim().is_empty() => None,
    Some(Value::String(key)) => Some(key.trim().to_string()),
    Some(_) => return Err(ValidationError::new("projectKey", "expected a string")),
  };

  Ok(FetchRequest { config, project_key })
}

fn required_string<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a str, ValidationError> {
  match object.get(field) {
    Some(Value::String(value)) => Ok(value),
    Some(_) => Err(ValidationError::new(field, "expected a string")),
    None => Err(ValidationError::new(field, "is required")),
  }
}

/// Trim, require an absolute http(s) URL, and drop one trailing slash.
fn check_base_url(raw: &str) -> Result<String, ValidationError> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Err(ValidationError::new(FIELD_BASE_URL, "is required"));
  }

  let url = Url::parse(trimmed).map_err(|e| ValidationError::new(FIELD_BASE_URL, format!("invalid URL: {e}")))?;
  if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
    return Err(ValidationError::new(
      FIELD_BASE_URL,
      "must be an absolute http or https URL",
    ));
  }

  Ok(trimmed.strip_suffix('/').unwrap_or(trimmed).to_string())
}

fn check_email(raw: &str) -> Result<String, ValidationError> {
  let trimmed = raw.trim();
  if !EMAIL_REGEX.is_match(trimmed) {
    return Err(ValidationError::new(FIELD_EMAIL, "invalid email address"));
  }
  Ok(trimmed.to_string())
}

fn check_secret(secret: &Secret) -> Result<(), ValidationError> {
  if secret.is_empty() {
    return Err(ValidationError::new(FIELD_API_KEY, "must not be empty"));
  }
  Ok(())
}
