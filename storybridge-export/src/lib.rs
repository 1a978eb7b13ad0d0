//! # Storybridge Export
//!
//! Turns a generation response into a downloadable document. JSON keeps the
//! response as-is, CSV lists one test case per row, and XLSX adds the token
//! usage columns on a single "Test Cases" sheet.

mod csv;
mod xlsx;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use storybridge_core::GenerateResponse;
use thiserror::Error;
use tracing::debug;

pub use crate::csv::to_csv;
pub use crate::xlsx::to_xlsx;

/// Document formats a response can be exported to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
  Json,
  Csv,
  Xlsx,
}

impl ExportFormat {
  /// File name the exported document is saved under
  pub fn file_name(self) -> &'static str {
    match self {
      ExportFormat::Json => "test-cases.json",
      ExportFormat::Csv => "test-cases.csv",
      ExportFormat::Xlsx => "test-cases.xlsx",
    }
  }

  pub fn content_type(self) -> &'static str {
    match self {
      ExportFormat::Json => "application/json",
      ExportFormat::Csv => "text/csv;charset=utf-8;",
      ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    }
  }
}

impl fmt::Display for ExportFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ExportFormat::Json => "json",
      ExportFormat::Csv => "csv",
      ExportFormat::Xlsx => "xlsx",
    };
    f.write_str(name)
  }
}

impl FromStr for ExportFormat {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "json" => Ok(ExportFormat::Json),
      "csv" => Ok(ExportFormat::Csv),
      "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
      other => Err(format!("unsupported export format '{other}' (expected json, csv or xlsx)")),
    }
  }
}

/// Failure while rendering or writing an export
#[derive(Debug, Error)]
pub enum ExportError {
  #[error("failed to encode JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("failed to build workbook: {0}")]
  Zip(#[from] zip::result::ZipError),

  #[error("failed to write {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Pretty-printed JSON with two-space indentation
pub fn to_json(response: &GenerateResponse) -> Result<String, ExportError> {
  Ok(serde_json::to_string_pretty(response)?)
}

/// Render `response` in `format`
pub fn export(response: &GenerateResponse, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
  debug!(%format, cases = response.cases.len(), "Exporting test cases");
  match format {
    ExportFormat::Json => to_json(response).map(String::into_bytes),
    ExportFormat::Csv => Ok(to_csv(response).into_bytes()),
    ExportFormat::Xlsx => to_xlsx(response),
  }
}

/// Render `response` and save it in `dir` under the format's file name.
///
/// Returns the path written. An existing file of the same name is replaced.
pub fn write_to_dir(dir: &Path, response: &GenerateResponse, format: ExportFormat) -> Result<PathBuf, ExportError> {
  let bytes = export(response, format)?;
  let path = dir.join(format.file_name());
  std::fs::write(&path, bytes).map_err(|source| ExportError::Io {
    path: path.clone(),
    source,
  })?;
  Ok(path)
}


#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_format_names() {
    assert_eq!(ExportFormat::Json.file_name(), "test-cases.json");
    assert_eq!(ExportFormat::Csv.file_name(), "test-cases.csv");
    assert_eq!(ExportFormat::Xlsx.file_name(), "test-cases.xlsx");
    assert_eq!(ExportFormat::Csv.content_type(), "text/csv;charset=utf-8;");
  }

  #[test]
  fn test_format_from_str() {
    assert_eq!("JSON".parse::<ExportFormat>(), Ok(ExportFormat::Json));
    assert_eq!("excel".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
    assert!("pdf".parse::<ExportFormat>().unwrap_err().contains("pdf"));
  }

  #[test]
  fn test_to_json_is_pretty() {
    let json = to_json(&fixtures::response()).unwrap();

    assert!(json.starts_with("{\n  \"cases\": [\n"));
    assert!(json.contains("\"promptTokens\": 120"));
    assert!(json.contains("\"expectedResult\": \"Dashboard is shown\""));
    assert!(!json.contains("testData\": null"));
    assert_eq!(GenerateResponse::from_json(&json).unwrap(), fixtures::response());
  }

  #[test]
  fn test_write_to_dir() {
    let temp_dir = TempDir::new().unwrap();

    for format in [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Xlsx] {
      let path = write_to_dir(temp_dir.path(), &fixtures::response(), format).unwrap();
      assert_eq!(path, temp_dir.path().join(format.file_name()));
      assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
  }

  #[test]
  fn test_write_to_missing_dir() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");

    let err = write_to_dir(&missing, &fixtures::response(), ExportFormat::Csv).unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }));
    assert!(err.to_string().contains("test-cases.csv"));
  }
}
