//! CSV rendering

use storybridge_core::GenerateResponse;

const HEADERS: [&str; 6] = [
  "Test Case ID",
  "Title",
  "Category",
  "Expected Result",
  "Steps",
  "Test Data",
];

/// One row per test case; lines are separated by `\n` with no trailing newline.
///
/// Id and category are written verbatim. Title, expected result, steps
/// (joined with ` | `) and test data are always quoted with inner quotes
/// doubled.
pub fn to_csv(response: &GenerateResponse) -> String {
  let mut lines = Vec::with_capacity(response.cases.len() + 1);
  lines.push(HEADERS.join(","));

  for case in &response.cases {
    let row = [
      case.id.clone(),
      quote(&case.title),
      case.category.clone(),
      quote(&case.expected_result),
      quote(&case.steps.join(" | ")),
      quote(case.test_data.as_deref().unwrap_or_default()),
    ];
    lines.push(row.join(","));
  }

  lines.join("\n")
}

fn quote(value: &str) -> String {
  format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
  use insta::assert_snapshot;
  use storybridge_core::GenerateResponse;

  use super::*;
  use crate::fixtures;

  #[test]
  fn test_to_csv() {
    assert_snapshot!(to_csv(&fixtures::response()), @r#"
    Test Case ID,Title,Category,Expected Result,Steps,Test Data
    TC-001,"Valid login",Positive,"Dashboard is shown","Open the login page | Submit valid credentials","user: dev@example.com"
    TC-002,"Password with ""quotes""",Negative,"Error, ""Invalid credentials""","Enter a <wrong> password & submit",""
    "#);
  }

  #[test]
  fn test_to_csv_without_cases() {
    let response = GenerateResponse {
      cases: Vec::new(),
      model: None,
      prompt_tokens: 0,
      completion_tokens: 0,
    };

    assert_eq!(
      to_csv(&response),
      "Test Case ID,Title,Category,Expected Result,Steps,Test Data"
    );
  }

  #[test]
  fn test_to_csv_has_no_trailing_newline() {
    assert!(!to_csv(&fixtures::response()).ends_with('\n'));
  }
}
