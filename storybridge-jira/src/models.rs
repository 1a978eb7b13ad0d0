use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::{DEFAULT_MAX_RESULTS, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SEARCH_FIELDS, STORY_ISSUE_TYPE};
use crate::error::{MappingError, ValidationError};

static PROJECT_KEY_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("Failed to compile project key regex"));

static FIELD_ID_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Failed to compile field id regex"));

/// Identity payload returned by the "current user" endpoint, passed through
/// unmodified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthenticatedIdentity(Map<String, Value>);

impl AuthenticatedIdentity {
  pub const fn as_map(&self) -> &Map<String, Value> {
    &self.0
  }

  pub fn display_name(&self) -> Option<&str> {
    self.0.get("displayName").and_then(Value::as_str)
  }

  pub fn email_address(&self) -> Option<&str> {
    self.0.get("emailAddress").and_then(Value::as_str)
  }
}

impl TryFrom<Value> for AuthenticatedIdentity {
  type Error = MappingError;

  fn try_from(value: Value) -> Result<Self, Self::Error> {
    match value {
      Value::Object(map) => Ok(Self(map)),
      other => Err(MappingError::new(format!(
        "identity response is not a JSON object: {other}"
      ))),
    }
  }
}

/// Status marker of a successful credential check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
  Connected,
}

/// Result of a successful credential check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connected {
  pub status: ConnectionStatus,
  pub identity: AuthenticatedIdentity,
}

impl Connected {
  pub const fn new(identity: AuthenticatedIdentity) -> Self {
    Self {
      status: ConnectionStatus::Connected,
      identity,
    }
  }
}

/// Acceptance criteria of a story.
///
/// Acceptance criteria live in an instance-specific custom field. Without a
/// configured field id they are reported as unavailable rather than guessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "lowercase")]
pub enum AcceptanceCriteria {
  Available(String),
  Unavailable,
}

impl AcceptanceCriteria {
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Available(text) => Some(text),
      Self::Unavailable => None,
    }
  }
}

/// Tracker issue in the stable internal shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedIssueRecord {
  /// Tracker issue key, e.g. `PROJ-123`
  pub id: String,
  pub title: String,
  /// Plain-text description, or the compact JSON of a rich-text document.
  /// A `null` or missing description is `""`, not the text `"null"`.
  pub description: String,
  pub acceptance_criteria: AcceptanceCriteria,
}

impl NormalizedIssueRecord {
  /// Build the test-case generation request for this story.
  ///
  /// Fails when the story carries no acceptance criteria.
  pub fn to_generate_request(&self) -> Result<storybridge_core::GenerateRequest, storybridge_core::SchemaError> {
    let request = storybridge_core::GenerateRequest {
      story_title: self.title.clone(),
      acceptance_criteria: self.acceptance_criteria.as_text().unwrap_or_default().to_string(),
      description: (!self.description.is_empty()).then(|| self.description.clone()),
      additional_info: None,
    };
    request.validate()?;
    Ok(request)
  }
}

/// Project key restricting a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectKey(String);

impl ProjectKey {
  pub fn parse(raw: &str) -> Result<Self, ValidationError> {
    let trimmed = raw.trim();
    if !PROJECT_KEY_REGEX.is_match(trimmed) {
      return Err(ValidationError::new(
        "projectKey",
        format!("invalid project key '{trimmed}'"),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Story search parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueQuery {
  scope: Option<ProjectKey>,
  page_size: u32,
  max_results: u32,
  acceptance_criteria_field: Option<String>,
}

impl Default for IssueQuery {
  fn default() -> Self {
    Self {
      scope: None,
      page_size: DEFAULT_PAGE_SIZE,
      max_results: DEFAULT_MAX_RESULTS,
      acceptance_criteria_field: None,
    }
  }
}

impl IssueQuery {
  pub fn new() -> Self {
    Self::default()
  }

  /// Restrict the search to one project
  pub fn with_scope(mut self, scope: ProjectKey) -> Self {
    self.scope = Some(scope);
    self
  }

  /// Issues requested per call, 1 to 100
  pub fn with_page_size(mut self, page_size: u32) -> Result<Self, ValidationError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
      return Err(ValidationError::new(
        "pageSize",
        format!("must be between 1 and {MAX_PAGE_SIZE}"),
      ));
    }
    self.page_size = page_size;
    Ok(self)
  }

  /// Cumulative cap across pages
  pub fn with_max_results(mut self, max_results: u32) -> Result<Self, ValidationError> {
    if max_results == 0 {
      return Err(ValidationError::new("maxResults", "must be at least 1"));
    }
    self.max_results = max_results;
    Ok(self)
  }

  /// Custom field holding acceptance criteria, e.g. `customfield_10042`
  pub fn with_acceptance_criteria_field(mut self, field: &str) -> Result<Self, ValidationError> {
    let field = field.trim();
    if !FIELD_ID_REGEX.is_match(field) {
      return Err(ValidationError::new(
        "acceptanceCriteriaField",
        format!("invalid field id '{field}'"),
      ));
    }
    self.acceptance_criteria_field = Some(field.to_string());
    Ok(self)
  }

  pub const fn scope(&self) -> Option<&ProjectKey> {
    self.scope.as_ref()
  }

  pub const fn page_size(&self) -> u32 {
    self.page_size
  }

  pub const fn max_results(&self) -> u32 {
    self.max_results
  }

  pub fn acceptance_criteria_field(&self) -> Option<&str> {
    self.acceptance_criteria_field.as_deref()
  }

  /// Whether more than one page may be requested
  pub const fn is_multi_page(&self) -> bool {
    self.max_results > self.page_size
  }

  /// JQL for stories, newest first
  pub fn jql(&self) -> String {
    match &self.scope {
      Some(project) => format!(
        "project = \"{}\" AND issuetype = {STORY_ISSUE_TYPE} ORDER BY created DESC",
        project.as_str()
      ),
      None => format!("issuetype = {STORY_ISSUE_TYPE} ORDER BY created DESC"),
    }
  }

  /// Issue fields to request
  pub fn fields(&self) -> Vec<String> {
    let mut fields: Vec<String> = SEARCH_FIELDS.iter().map(|field| field.to_string()).collect();
    if let Some(field) = &self.acceptance_criteria_field {
      fields.push(field.clone());
    }
    fields
  }
}

/// Request body of the JQL search endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
  pub jql: &'a str,
  pub max_results: u32,
  pub fields: &'a [String],
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_page_token: Option<&'a str>,
}

/// One page of search results, issues still in tracker shape
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
  pub issues: Vec<Value>,
  #[serde(default)]
  pub next_page_token: Option<String>,
  #[serde(default)]
  pub is_last: Option<bool>,
}

/// Tracker issue as returned by the search endpoint
#[derive(Debug, Deserialize)]
pub struct JiraIssue {
  pub key: String,
  pub fields: JiraIssueFields,
}

/// Fields of a tracker issue; unknown fields are kept for custom lookups
#[derive(Debug, Deserialize)]
pub struct JiraIssueFields {
  pub summary: String,
  #[serde(default)]
  pub description: Value,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}
