//! # HTTP Transport
//!
//! The single suspension point of every operation. A [`Transport`] sends one
//! fully built request and hands back the status and body untouched; status
//! classification happens in the client. Dropping the returned future aborts
//! the request.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::consts::{DEFAULT_TIMEOUT, USER_AGENT};
use crate::error::{TransportError, TransportErrorKind};

/// HTTP methods used against the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
  Get,
  Post,
}

impl fmt::Display for HttpMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Get => f.write_str("GET"),
      Self::Post => f.write_str("POST"),
    }
  }
}

/// A fully built outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
  pub method: HttpMethod,
  pub url: String,
  pub headers: Vec<(&'static str, String)>,
  /// Serialized JSON body
  pub body: Option<String>,
}

impl HttpRequest {
  /// Look up a header value by case-insensitive name
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(key, _)| key.eq_ignore_ascii_case(name))
      .map(|(_, value)| value.as_str())
  }
}

/// Status line and raw body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
  pub status: u16,
  pub status_text: String,
  pub body: String,
}

impl HttpResponse {
  pub const fn is_success(&self) -> bool {
    self.status >= 200 && self.status < 300
  }
}

/// Sends requests to the tracker.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport with a bounded per-request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
  client: Client,
  timeout: Duration,
}

impl HttpTransport {
  /// Create a transport with the default timeout
  pub fn new() -> Result<Self, TransportError> {
    Self::with_timeout(DEFAULT_TIMEOUT)
  }

  /// Create a transport whose requests give up after `timeout`
  pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(USER_AGENT)
      .build()
      .map_err(|e| TransportError::new(TransportErrorKind::Other, format!("Failed to build HTTP client: {e}")))?;

    Ok(Self { client, timeout })
  }

  pub const fn timeout(&self) -> Duration {
    self.timeout
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let method = match request.method {
      HttpMethod::Get => reqwest::Method::GET,
      HttpMethod::Post => reqwest::Method::POST,
    };

    let mut builder = self.client.request(method, &request.url);
    for (name, value) in &request.headers {
      builder = builder.header(*name, value);
    }
    if let Some(body) = request.body {
      builder = builder.body(body);
    }

    let response = builder.send().await?;
    let status = response.status();
    let body = response.text().await?;

    Ok(HttpResponse {
      status: status.as_u16(),
      status_text: status.canonical_reason().unwrap_or_default().to_string(),
      body,
    })
  }
}

impl From<reqwest::Error> for TransportError {
  fn from(err: reqwest::Error) -> Self {
    let kind = if err.is_timeout() {
      TransportErrorKind::Timeout
    } else if err.is_connect() {
      TransportErrorKind::Connect
    } else {
      TransportErrorKind::Other
    };
    Self::new(kind, err.to_string())
  }
}
