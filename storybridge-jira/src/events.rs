//! # Operation Events
//!
//! Every operation reports its name, outcome and latency to an injected
//! [`EventSink`]. The default sink forwards to `tracing`.

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::JiraError;

/// Operations that emit events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  ValidateAndConnect,
  FetchStories,
}

impl Operation {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::ValidateAndConnect => "validate-and-connect",
      Self::FetchStories => "fetch-stories",
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Terminal state an operation ended in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Success,
  ValidationFailed,
  TransportFailed,
  RemoteRejected,
  MappingFailed,
}

impl Outcome {
  pub fn of<T>(result: &Result<T, JiraError>) -> Self {
    match result {
      Ok(_) => Self::Success,
      Err(JiraError::Validation(_)) => Self::ValidationFailed,
      Err(JiraError::Transport(_)) => Self::TransportFailed,
      Err(JiraError::Remote(_)) => Self::RemoteRejected,
      Err(JiraError::Mapping(_)) => Self::MappingFailed,
    }
  }

  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Success => "success",
      Self::ValidationFailed => "validation_failed",
      Self::TransportFailed => "transport_failed",
      Self::RemoteRejected => "remote_rejected",
      Self::MappingFailed => "mapping_failed",
    }
  }
}

/// One finished operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationEvent {
  pub operation: Operation,
  pub outcome: Outcome,
  pub latency: Duration,
  /// Upstream HTTP status for remote rejections
  pub status: Option<u16>,
}

/// Receives operation events.
pub trait EventSink: Send + Sync {
  fn record(&self, event: &OperationEvent);
}

/// Emits events as `tracing` events on the `storybridge::events` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
  fn record(&self, event: &OperationEvent) {
    let latency_ms = u64::try_from(event.latency.as_millis()).unwrap_or(u64::MAX);
    match event.outcome {
      Outcome::Success => info!(
        target: "storybridge::events",
        operation = event.operation.as_str(),
        outcome = event.outcome.as_str(),
        latency_ms,
        "operation finished"
      ),
      _ => warn!(
        target: "storybridge::events",
        operation = event.operation.as_str(),
        outcome = event.outcome.as_str(),
        status = event.status,
        latency_ms,
        "operation failed"
      ),
    }
  }
}

/// Discards events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
  fn record(&self, _event: &OperationEvent) {}
}

/// Keeps events in memory, for inspection in tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingSink {
  events: Mutex<Vec<OperationEvent>>,
}

impl RecordingSink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn events(&self) -> Vec<OperationEvent> {
    self.events.lock().map(|events| events.clone()).unwrap_or_default()
  }
}

impl EventSink for RecordingSink {
  fn record(&self, event: &OperationEvent) {
    if let Ok(mut events) = self.events.lock() {
      events.push(event.clone());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::{MappingError, RemoteError, TransportError, TransportErrorKind, ValidationError};

  #[test]
  fn test_outcome_of() {
    let ok: Result<(), JiraError> = Ok(());
    assert_eq!(Outcome::of(&ok), Outcome::Success);

    let err: Result<(), JiraError> = Err(ValidationError::new("email", "is required").into());
    assert_eq!(Outcome::of(&err), Outcome::ValidationFailed);

    let err: Result<(), JiraError> = Err(TransportError::new(TransportErrorKind::Connect, "refused").into());
    assert_eq!(Outcome::of(&err), Outcome::TransportFailed);

    let err: Result<(), JiraError> = Err(
      RemoteError {
        status: 500,
        status_text: "Internal Server Error".to_string(),
        body: String::new(),
      }
      .into(),
    );
    assert_eq!(Outcome::of(&err), Outcome::RemoteRejected);

    let err: Result<(), JiraError> = Err(MappingError::new("bad").into());
    assert_eq!(Outcome::of(&err), Outcome::MappingFailed);
  }

  #[test]
  fn test_recording_sink() {
    let sink = RecordingSink::new();
    sink.record(&OperationEvent {
      operation: Operation::FetchStories,
      outcome: Outcome::Success,
      latency: Duration::from_millis(12),
      status: None,
    });

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].operation.as_str(), "fetch-stories");
    assert_eq!(events[0].outcome.as_str(), "success");
  }
}
