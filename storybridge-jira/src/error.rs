//! # Error Taxonomy
//!
//! The four ways a Jira operation can fail. Each kind carries enough
//! structure for callers to tell them apart without parsing messages.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Malformed input. No request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
  /// Name of the offending input field, using the wire name (e.g. `baseUrl`)
  pub field: String,
  pub message: String,
}

impl ValidationError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      message: message.into(),
    }
  }
}

/// Classification of network-level failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
  /// The request did not complete within the configured timeout
  Timeout,
  /// DNS resolution or connection establishment failed
  Connect,
  /// Any other failure while sending or reading the response
  Other,
}

impl fmt::Display for TransportErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Self::Timeout => "timeout",
      Self::Connect => "connect",
      Self::Other => "other",
    };
    f.write_str(label)
  }
}

/// The tracker could not be reached. Retryable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failure ({kind}): {message}")]
pub struct TransportError {
  pub kind: TransportErrorKind,
  pub message: String,
}

impl TransportError {
  pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
    }
  }
}

/// The tracker answered with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Jira responded with HTTP {status} {status_text}")]
pub struct RemoteError {
  pub status: u16,
  pub status_text: String,
  /// Raw response body, kept verbatim for diagnostics
  pub body: String,
}

impl RemoteError {
  /// Whether the tracker rejected the credentials rather than the request
  pub const fn is_auth_failure(&self) -> bool {
    matches!(self.status, 401 | 403)
  }
}

/// The tracker answered 2xx but the payload did not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected Jira response: {message}")]
pub struct MappingError {
  pub message: String,
}

impl MappingError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

/// Failure category, stable across releases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  Validation,
  Transport,
  Remote,
  Mapping,
}

impl ErrorKind {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Validation => "validation",
      Self::Transport => "transport",
      Self::Remote => "remote",
      Self::Mapping => "mapping",
    }
  }
}

/// Any failure of a Jira operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JiraError {
  #[error("invalid input: {0}")]
  Validation(#[from] ValidationError),
  #[error(transparent)]
  Transport(#[from] TransportError),
  #[error(transparent)]
  Remote(#[from] RemoteError),
  #[error(transparent)]
  Mapping(#[from] MappingError),
}

impl JiraError {
  pub const fn kind(&self) -> ErrorKind {
    match self {
      Self::Validation(_) => ErrorKind::Validation,
      Self::Transport(_) => ErrorKind::Transport,
      Self::Remote(_) => ErrorKind::Remote,
      Self::Mapping(_) => ErrorKind::Mapping,
    }
  }

  /// Upstream HTTP status, when the tracker answered
  pub const fn upstream_status(&self) -> Option<u16> {
    match self {
      Self::Remote(err) => Some(err.status),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_kinds() {
    let validation: JiraError = ValidationError::new("email", "is required").into();
    let transport: JiraError = TransportError::new(TransportErrorKind::Timeout, "timed out").into();
    let remote: JiraError = RemoteError {
      status: 401,
      status_text: "Unauthorized".to_string(),
      body: String::new(),
    }
    .into();
    let mapping: JiraError = MappingError::new("missing issues").into();

    assert_eq!(validation.kind(), ErrorKind::Validation);
    assert_eq!(transport.kind(), ErrorKind::Transport);
    assert_eq!(remote.kind(), ErrorKind::Remote);
    assert_eq!(mapping.kind(), ErrorKind::Mapping);

    assert_eq!(remote.upstream_status(), Some(401));
    assert_eq!(transport.upstream_status(), None);
  }

  #[test]
  fn test_error_messages() {
    let err = JiraError::from(ValidationError::new("baseUrl", "is required"));
    assert_eq!(err.to_string(), "invalid input: baseUrl: is required");

    let err = TransportError::new(TransportErrorKind::Connect, "connection refused");
    assert_eq!(err.to_string(), "transport failure (connect): connection refused");
  }

  #[test]
  fn test_auth_failure_statuses() {
    let remote = |status| RemoteError {
      status,
      status_text: String::new(),
      body: String::new(),
    };

    assert!(remote(401).is_auth_failure());
    assert!(remote(403).is_auth_failure());
    assert!(!remote(404).is_auth_failure());
    assert!(!remote(500).is_auth_failure());
  }
}
