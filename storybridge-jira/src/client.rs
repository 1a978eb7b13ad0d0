//! # Jira HTTP Client
//!
//! Builds authenticated requests against the Jira REST API and classifies
//! the responses. A non-2xx status is an ordinary [`RemoteError`], not a
//! transport failure, and no request is ever retried.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::debug;

use crate::auth::basic_auth_header;
use crate::config::ConnectionConfig;
use crate::error::{JiraError, MappingError, RemoteError, TransportError};
use crate::events::{EventSink, Operation, OperationEvent, Outcome, TracingSink};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport, Transport};

/// Represents a Jira API client.
///
/// The client holds no per-connection state: connection parameters are passed
/// to every call, so one client can serve concurrent callers.
pub struct JiraClient<T = HttpTransport> {
  pub(crate) transport: T,
  pub(crate) sink: Arc<dyn EventSink>,
}

impl JiraClient<HttpTransport> {
  /// Create a client over HTTP with the default timeout
  pub fn new() -> Result<Self, TransportError> {
    Ok(Self::with_transport(HttpTransport::new()?))
  }
}

impl<T: Transport> JiraClient<T> {
  /// Create a client over any transport
  pub fn with_transport(transport: T) -> Self {
    Self {
      transport,
      sink: Arc::new(TracingSink),
    }
  }

  /// Replace the event sink
  pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
    self.sink = sink;
    self
  }

  pub const fn transport(&self) -> &T {
    &self.transport
  }

  /// Issue one authenticated request and classify the response.
  ///
  /// Returns the parsed JSON body for 2xx responses. A 2xx body that is not
  /// JSON is a [`MappingError`].
  pub async fn request(
    &self,
    config: &ConnectionConfig,
    path: &str,
    method: HttpMethod,
    body: Option<&Value>,
  ) -> Result<Value, JiraError> {
    let url = endpoint_url(config.base_url(), path);

    let mut headers = vec![
      ("Authorization", basic_auth_header(config.account(), config.secret())),
      ("Accept", "application/json".to_string()),
    ];
    if body.is_some() {
      headers.push(("Content-Type", "application/json".to_string()));
    }

    debug!(%method, %url, "Sending Jira request");

    let response = self
      .transport
      .execute(HttpRequest {
        method,
        url,
        headers,
        body: body.map(Value::to_string),
      })
      .await?;

    if !response.is_success() {
      debug!(status = response.status, "Jira rejected the request");
      return Err(
        RemoteError {
          status: response.status,
          status_text: response.status_text,
          body: response.body,
        }
        .into(),
      );
    }

    serde_json::from_str(&response.body)
      .map_err(|e| MappingError::new(format!("response body is not valid JSON: {e}")).into())
  }

  /// Run an operation and report its outcome to the event sink.
  pub(crate) async fn observe<R>(
    &self,
    operation: Operation,
    work: impl Future<Output = Result<R, JiraError>>,
  ) -> Result<R, JiraError> {
    let started = Instant::now();
    let result = work.await;
    let status = result.as_ref().err().and_then(JiraError::upstream_status);
    self.emit(operation, Outcome::of(&result), started.elapsed(), status);
    result
  }

  pub(crate) fn emit(&self, operation: Operation, outcome: Outcome, latency: Duration, status: Option<u16>) {
    self.sink.record(&OperationEvent {
      operation,
      outcome,
      latency,
      status,
    });
  }
}

/// Join a base URL and an endpoint path with exactly one slash between them.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
  format!(
    "{}/{}",
    base_url.trim_end_matches('/'),
    path.trim_start_matches('/')
  )
}

/// Create a Jira client over HTTP whose requests give up after `timeout`
pub fn create_jira_client(timeout: Duration) -> Result<JiraClient, TransportError> {
  Ok(JiraClient::with_transport(HttpTransport::with_timeout(timeout)?))
}
