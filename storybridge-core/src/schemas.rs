//! # Generation Schemas
//!
//! Shapes exchanged with the test-case generator: the request built from a
//! story, the generated test cases, and the response carrying token usage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A schema violation, naming the first offending field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct SchemaError {
  pub field: String,
  pub message: String,
}

impl SchemaError {
  fn new(field: &str, message: &str) -> Self {
    Self {
      field: field.to_string(),
      message: message.to_string(),
    }
  }
}

/// Input to test-case generation for one story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
  pub story_title: String,
  pub acceptance_criteria: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub additional_info: Option<String>,
}

impl GenerateRequest {
  pub fn validate(&self) -> Result<(), SchemaError> {
    if self.story_title.trim().is_empty() {
      return Err(SchemaError::new("storyTitle", "Story title is required"));
    }
    if self.acceptance_criteria.trim().is_empty() {
      return Err(SchemaError::new(
        "acceptanceCriteria",
        "Acceptance criteria is required",
      ));
    }
    Ok(())
  }
}

/// One generated test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
  pub id: String,
  pub title: String,
  pub steps: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub test_data: Option<String>,
  pub expected_result: String,
  pub category: String,
}

/// Generated test cases together with token usage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
  pub cases: Vec<TestCase>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub model: Option<String>,
  pub prompt_tokens: u64,
  pub completion_tokens: u64,
}

impl GenerateResponse {
  /// Parse a generation response from JSON text
  pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(text)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_generate_request_validation() {
    let mut request = GenerateRequest {
      story_title: "Login".to_string(),
      acceptance_criteria: "Given a user".to_string(),
      description: None,
      additional_info: None,
    };
    assert!(request.validate().is_ok());

    request.acceptance_criteria = "  ".to_string();
    let err = request.validate().unwrap_err();
    assert_eq!(err.field, "acceptanceCriteria");

    request.story_title = String::new();
    let err = request.validate().unwrap_err();
    assert_eq!(err.to_string(), "storyTitle: Story title is required");
  }

  #[test]
  fn test_generate_request_wire_shape() {
    let request = GenerateRequest {
      story_title: "Login".to_string(),
      acceptance_criteria: "Given a user".to_string(),
      description: Some("As a user".to_string()),
      additional_info: None,
    };

    assert_eq!(
      serde_json::to_value(&request).unwrap(),
      json!({
          "storyTitle": "Login",
          "acceptanceCriteria": "Given a user",
          "description": "As a user"
      })
    );
  }

  #[test]
  fn test_generate_response_deserialization() {
    let response = GenerateResponse::from_json(
      r#"{
        "cases": [{
          "id": "TC-001",
          "title": "Valid login",
          "steps": ["Open page", "Submit"],
          "expectedResult": "Dashboard shown",
          "category": "Positive"
        }],
        "model": "gpt-4o-mini",
        "promptTokens": 120,
        "completionTokens": 340
      }"#,
    )
    .unwrap();

    assert_eq!(response.cases.len(), 1);
    assert_eq!(response.cases[0].test_data, None);
    assert_eq!(response.cases[0].steps, vec!["Open page", "Submit"]);
    assert_eq!(response.model.as_deref(), Some("gpt-4o-mini"));
    assert_eq!(response.prompt_tokens, 120);
    assert_eq!(response.completion_tokens, 340);

    assert!(GenerateResponse::from_json(r#"{ "cases": [] }"#).is_err());
  }
}
