//! # Issue Normalization
//!
//! Maps tracker issues onto [`NormalizedIssueRecord`]s. The description
//! field comes back either as plain text or as a rich-text document; both
//! are coerced to a string. Anything else that does not match the expected
//! shape is a [`MappingError`].

use serde_json::Value;

use crate::error::MappingError;
use crate::models::{AcceptanceCriteria, JiraIssue, NormalizedIssueRecord, SearchPage};

/// Coerce a text-like field to a plain string.
///
/// Strings are kept as is, `null` becomes empty, and structured values are
/// serialized to compact JSON.
pub fn coerce_text(value: &Value) -> String {
  match value {
    Value::String(text) => text.clone(),
    Value::Null => String::new(),
    other => other.to_string(),
  }
}

/// Parse one page of a search response.
pub fn parse_search_page(body: Value) -> Result<SearchPage, MappingError> {
  serde_json::from_value(body).map_err(|e| MappingError::new(format!("invalid search response: {e}")))
}

/// Map a single tracker issue. `index` is its position in the overall result
/// and only used for error messages.
pub fn normalize_issue(
  index: usize,
  issue: Value,
  acceptance_criteria_field: Option<&str>,
) -> Result<NormalizedIssueRecord, MappingError> {
  let issue: JiraIssue =
    serde_json::from_value(issue).map_err(|e| MappingError::new(format!("issue #{index}: {e}")))?;

  let acceptance_criteria = acceptance_criteria_field
    .and_then(|field| issue.fields.extra.get(field))
    .filter(|value| !value.is_null())
    .map_or(AcceptanceCriteria::Unavailable, |value| {
      AcceptanceCriteria::Available(coerce_text(value))
    });

  Ok(NormalizedIssueRecord {
    id: issue.key,
    title: issue.fields.summary,
    description: coerce_text(&issue.fields.description),
    acceptance_criteria,
  })
}
