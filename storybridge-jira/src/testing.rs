//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{TransportError, TransportErrorKind};
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Replays queued responses in order and records every request it sees.
#[derive(Debug, Default)]
pub struct StubTransport {
  responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
  requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
  pub fn new() -> Self {
    Self::default()
  }

  /// Queue a response with the given status and raw body
  pub fn respond(self, status: u16, body: &str) -> Self {
    let status_text = StatusCode::from_u16(status)
      .ok()
      .and_then(|code| code.canonical_reason())
      .unwrap_or_default()
      .to_string();
    self.push(Ok(HttpResponse {
      status,
      status_text,
      body: body.to_string(),
    }))
  }

  /// Queue a 200 response with a JSON body
  pub fn respond_json(self, body: &Value) -> Self {
    self.respond(200, &body.to_string())
  }

  /// Queue a connection failure
  pub fn fail_connect(self) -> Self {
    self.push(Err(TransportError::new(
      TransportErrorKind::Connect,
      "connection refused",
    )))
  }

  fn push(self, response: Result<HttpResponse, TransportError>) -> Self {
    if let Ok(mut responses) = self.responses.lock() {
      responses.push_back(response);
    }
    self
  }

  /// Requests seen so far
  pub fn requests(&self) -> Vec<HttpRequest> {
    self.requests.lock().map(|requests| requests.clone()).unwrap_or_default()
  }

  /// Number of requests seen so far
  pub fn calls(&self) -> usize {
    self.requests().len()
  }

  /// Parsed JSON body of the n-th request
  pub fn request_body(&self, index: usize) -> Option<Value> {
    self
      .requests()
      .get(index)
      .and_then(|request| request.body.as_deref())
      .and_then(|body| serde_json::from_str(body).ok())
  }
}

#[async_trait]
impl Transport for StubTransport {
  async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    if let Ok(mut requests) = self.requests.lock() {
      requests.push(request);
    }
    self
      .responses
      .lock()
      .ok()
      .and_then(|mut responses| responses.pop_front())
      .unwrap_or_else(|| {
        Err(TransportError::new(
          TransportErrorKind::Other,
          "no stubbed response left",
        ))
      })
  }
}
