//! # Credential Check
//!
//! Confirms connection parameters against the "current user" endpoint.

use crate::client::JiraClient;
use crate::config::ConnectionConfig;
use crate::consts::MYSELF_PATH;
use crate::error::JiraError;
use crate::events::Operation;
use crate::models::{AuthenticatedIdentity, Connected};
use crate::transport::{HttpMethod, Transport};

impl<T: Transport> JiraClient<T> {
  /// Validate credentials by fetching the current user.
  ///
  /// Sends exactly one request and has no side effects on the tracker. A
  /// rejection keeps the upstream status so callers can tell bad credentials
  /// (401/403) from other failures.
  pub async fn validate_credentials(&self, config: &ConnectionConfig) -> Result<Connected, JiraError> {
    self
      .observe(Operation::ValidateAndConnect, async {
        let body = self.request(config, MYSELF_PATH, HttpMethod::Get, None).await?;
        let identity = AuthenticatedIdentity::try_from(body)?;
        Ok::<_, JiraError>(Connected::new(identity))
      })
      .await
  }
}
