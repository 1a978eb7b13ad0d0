//! # Caller-Facing Operations
//!
//! "validate-and-connect" and "fetch-stories" as consumed by outer layers:
//! raw JSON input in, serializable success or structured error out. Input is
//! always validated before the client is touched, so a validation failure
//! never produces a request.

use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::client::JiraClient;
use crate::config::{ConnectionConfig, validate_connection_config, validate_fetch_request};
use crate::consts::{DEFAULT_MAX_RESULTS, DEFAULT_PAGE_SIZE};
use crate::error::{ErrorKind, JiraError, TransportErrorKind, ValidationError};
use crate::events::{Operation, Outcome};
use crate::models::{Connected, IssueQuery, NormalizedIssueRecord, ProjectKey};
use crate::transport::Transport;

/// Message returned when the tracker rejects a credential check
pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to Jira. Check credentials.";

/// Structured failure with an HTTP-status-like code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
  pub code: u16,
  pub kind: ErrorKind,
  pub error: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<String>,
}

impl ApiError {
  /// Shape an error from "validate-and-connect"
  pub fn for_connect(err: JiraError) -> Self {
    match err {
      JiraError::Remote(remote) => Self {
        code: remote.status,
        kind: ErrorKind::Remote,
        error: CONNECT_FAILED_MESSAGE.to_string(),
        details: None,
      },
      other => Self::common(other),
    }
  }

  /// Shape an error from "fetch-stories", keeping the upstream body
  pub fn for_fetch(err: JiraError) -> Self {
    match err {
      JiraError::Remote(remote) => Self {
        code: remote.status,
        kind: ErrorKind::Remote,
        error: format!("Failed to fetch stories: {}", remote.status_text),
        details: Some(remote.body),
      },
      other => Self::common(other),
    }
  }

  fn common(err: JiraError) -> Self {
    match err {
      JiraError::Validation(validation) => Self {
        code: 400,
        kind: ErrorKind::Validation,
        error: validation.to_string(),
        details: None,
      },
      JiraError::Transport(transport) => Self {
        code: if transport.kind == TransportErrorKind::Timeout { 504 } else { 502 },
        kind: ErrorKind::Transport,
        error: "Unable to reach Jira".to_string(),
        details: Some(transport.message),
      },
      JiraError::Remote(remote) => Self {
        code: remote.status,
        kind: ErrorKind::Remote,
        error: remote.to_string(),
        details: Some(remote.body),
      },
      JiraError::Mapping(mapping) => Self {
        code: 502,
        kind: ErrorKind::Mapping,
        error: "Unexpected response from Jira".to_string(),
        details: Some(mapping.message),
      },
    }
  }
}

/// Success payload of "fetch-stories"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoriesResponse {
  pub records: Vec<NormalizedIssueRecord>,
}

/// Search tuning that is not part of the caller's request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
  pub page_size: u32,
  pub max_results: u32,
  pub acceptance_criteria_field: Option<String>,
}

impl Default for FetchOptions {
  fn default() -> Self {
    Self {
      page_size: DEFAULT_PAGE_SIZE,
      max_results: DEFAULT_MAX_RESULTS,
      acceptance_criteria_field: None,
    }
  }
}

impl FetchOptions {
  /// Build the query for an optional project key
  pub fn to_query(&self, project_key: Option<&str>) -> Result<IssueQuery, ValidationError> {
    let mut query = IssueQuery::new()
      .with_page_size(self.page_size)?
      .with_max_results(self.max_results)?;
    if let Some(field) = &self.acceptance_criteria_field {
      query = query.with_acceptance_criteria_field(field)?;
    }
    if let Some(key) = project_key {
      query = query.with_scope(ProjectKey::parse(key)?);
    }
    Ok(query)
  }
}

/// Validate raw connection input and check it against the tracker.
pub async fn validate_and_connect<T: Transport>(client: &JiraClient<T>, input: &Value) -> Result<Connected, ApiError> {
  let started = Instant::now();
  let config = validate_connection_config(input).map_err(|err| {
    client.emit(
      Operation::ValidateAndConnect,
      Outcome::ValidationFailed,
      started.elapsed(),
      None,
    );
    ApiError::for_connect(err.into())
  })?;

  client.validate_credentials(&config).await.map_err(ApiError::for_connect)
}

/// Validate a raw `{config, projectKey?}` request and fetch stories.
pub async fn fetch_stories<T: Transport>(
  client: &JiraClient<T>,
  input: &Value,
  options: &FetchOptions,
) -> Result<StoriesResponse, ApiError> {
  let started = Instant::now();
  let request = validate_fetch_request(input).map_err(|err| {
    client.emit(
      Operation::FetchStories,
      Outcome::ValidationFailed,
      started.elapsed(),
      None,
    );
    ApiError::for_fetch(err.into())
  })?;

  fetch_stories_with(client, &request.config, options, request.project_key.as_deref()).await
}

/// Fetch stories for an already validated connection.
///
/// `options` and `project_key` are validated here, before any request.
pub async fn fetch_stories_with<T: Transport>(
  client: &JiraClient<T>,
  config: &ConnectionConfig,
  options: &FetchOptions,
  project_key: Option<&str>,
) -> Result<StoriesResponse, ApiError> {
  let started = Instant::now();
  let query = options.to_query(project_key).map_err(|err| {
    client.emit(
      Operation::FetchStories,
      Outcome::ValidationFailed,
      started.elapsed(),
      None,
    );
    ApiError::for_fetch(err.into())
  })?;

  let records = client.fetch_stories(config, &query).await.map_err(ApiError::for_fetch)?;
  Ok(StoriesResponse { records })
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use serde_json::json;

  use super::*;
  use crate::error::{MappingError, RemoteError, TransportError};
  use crate::events::RecordingSink;
  use crate::testing::StubTransport;

  fn config_input() -> Value {
    json!({
        "baseUrl": "https://x.atlassian.net/",
        "email": "dev@example.com",
        "apiKey": "token"
    })
  }

  #[tokio::test]
  async fn test_validate_and_connect() {
    let client = JiraClient::with_transport(StubTransport::new().respond_json(&json!({ "displayName": "Dev" })));

    let connected = validate_and_connect(&client, &config_input()).await.unwrap();

    assert_eq!(
      serde_json::to_value(&connected).unwrap(),
      json!({ "status": "connected", "identity": { "displayName": "Dev" } })
    );
  }

  #[tokio::test]
  async fn test_invalid_input_never_calls_transport() {
    let sink = Arc::new(RecordingSink::new());
    let client = JiraClient::with_transport(StubTransport::new()).with_event_sink(sink.clone());

    let inputs = [
      json!({}),
      json!({ "baseUrl": "nope", "email": "dev@example.com", "apiKey": "t" }),
      json!({ "baseUrl": "https://x.atlassian.net", "email": "dev", "apiKey": "t" }),
      json!({ "baseUrl": "https://x.atlassian.net", "email": "dev@example.com", "apiKey": "" }),
      json!(null),
    ];

    for input in &inputs {
      let err = validate_and_connect(&client, input).await.unwrap_err();
      assert_eq!(err.code, 400);
      assert_eq!(err.kind, ErrorKind::Validation);

      let err = fetch_stories(&client, &json!({ "config": input }), &FetchOptions::default())
        .await
        .unwrap_err();
      assert_eq!(err.code, 400);
    }

    assert_eq!(client.transport().calls(), 0);
    assert!(
      sink
        .events()
        .iter()
        .all(|event| event.outcome == Outcome::ValidationFailed)
    );
  }

  #[tokio::test]
  async fn test_invalid_project_key_never_calls_transport() {
    let client = JiraClient::with_transport(StubTransport::new());

    let err = fetch_stories(
      &client,
      &json!({ "config": config_input(), "projectKey": "PROJ OR 1=1" }),
      &FetchOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.code, 400);
    assert!(err.error.contains("projectKey"));
    assert_eq!(client.transport().calls(), 0);
  }

  #[tokio::test]
  async fn test_fetch_with_bad_options_emits_validation_event() {
    let sink = Arc::new(RecordingSink::new());
    let client = JiraClient::with_transport(StubTransport::new()).with_event_sink(sink.clone());
    let config = ConnectionConfig::new("https://x.atlassian.net", "dev@example.com", crate::config::Secret::new("t"))
      .unwrap();
    let options = FetchOptions {
      page_size: 500,
      ..FetchOptions::default()
    };

    let err = fetch_stories_with(&client, &config, &options, None).await.unwrap_err();

    assert_eq!(err.code, 400);
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(client.transport().calls(), 0);
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].operation, Operation::FetchStories);
    assert_eq!(events[0].outcome, Outcome::ValidationFailed);
  }

  #[tokio::test]
  async fn test_connect_unauthorized() {
    let client = JiraClient::with_transport(StubTransport::new().respond(401, "Client must be authenticated"));

    let err = validate_and_connect(&client, &config_input()).await.unwrap_err();

    assert_eq!(err.code, 401);
    assert_eq!(err.kind, ErrorKind::Remote);
    assert_eq!(err.error, CONNECT_FAILED_MESSAGE);
  }

  #[tokio::test]
  async fn test_connect_unreachable() {
    let client = JiraClient::with_transport(StubTransport::new().fail_connect());

    let err = validate_and_connect(&client, &config_input()).await.unwrap_err();

    assert_eq!(err.code, 502);
    assert_eq!(err.kind, ErrorKind::Transport);
  }

  #[tokio::test]
  async fn test_fetch_stories_response() {
    let client = JiraClient::with_transport(StubTransport::new().respond_json(&json!({
        "issues": [{ "key": "PROJ-1", "fields": { "summary": "Login", "description": "As a user" } }]
    })));

    let response = fetch_stories(
      &client,
      &json!({ "config": config_input(), "projectKey": "PROJ" }),
      &FetchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(
      serde_json::to_value(&response).unwrap(),
      json!({
          "records": [{
              "id": "PROJ-1",
              "title": "Login",
              "description": "As a user",
              "acceptanceCriteria": { "state": "unavailable" }
          }]
      })
    );
    assert_eq!(
      client.transport().request_body(0).unwrap()["jql"],
      "project = \"PROJ\" AND issuetype = Story ORDER BY created DESC"
    );
  }

  #[tokio::test]
  async fn test_fetch_stories_rejected() {
    let client = JiraClient::with_transport(StubTransport::new().respond(410, r#"{"errorMessages":["gone"]}"#));

    let err = fetch_stories(&client, &json!({ "config": config_input() }), &FetchOptions::default())
      .await
      .unwrap_err();

    assert_eq!(err.code, 410);
    assert_eq!(err.error, "Failed to fetch stories: Gone");
    assert_eq!(err.details.as_deref(), Some(r#"{"errorMessages":["gone"]}"#));
  }

  #[test]
  fn test_api_error_serialization() {
    let err = ApiError::for_fetch(MappingError::new("issue #0: missing field `key`").into());
    assert_eq!(
      serde_json::to_value(&err).unwrap(),
      json!({
          "code": 502,
          "kind": "mapping",
          "error": "Unexpected response from Jira",
          "details": "issue #0: missing field `key`"
      })
    );

    let err = ApiError::for_connect(TransportError::new(TransportErrorKind::Timeout, "timed out").into());
    assert_eq!(err.code, 504);

    let err = ApiError::for_connect(
      RemoteError {
        status: 503,
        status_text: "Service Unavailable".to_string(),
        body: "down".to_string(),
      }
      .into(),
    );
    assert_eq!(err.code, 503);
    assert_eq!(err.details, None);
  }

  #[test]
  fn test_fetch_options_to_query() {
    let options = FetchOptions {
      page_size: 25,
      max_results: 100,
      acceptance_criteria_field: Some("customfield_1".to_string()),
    };
    let query = options.to_query(Some("ME")).unwrap();

    assert_eq!(query.page_size(), 25);
    assert_eq!(query.max_results(), 100);
    assert_eq!(query.scope().map(ProjectKey::as_str), Some("ME"));
    assert_eq!(query.acceptance_criteria_field(), Some("customfield_1"));

    let bad = FetchOptions {
      page_size: 0,
      ..FetchOptions::default()
    };
    assert_eq!(bad.to_query(None).unwrap_err().field, "pageSize");
  }
}
