//! Authentication helpers for the Jira client.
//!
//! Credential sources let callers decide where the API token comes from
//! without changing how requests are authenticated. Whatever the source, the
//! token ends up in a [`Secret`] and is only exposed when the Basic
//! authorization header is built.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::Secret;
use crate::error::ValidationError;

/// A place an API token can be resolved from.
pub trait CredentialSource: Send + Sync {
  fn resolve(&self) -> Result<Secret, ValidationError>;
}

/// A token supplied directly by the caller.
#[derive(Debug, Clone)]
pub struct StaticCredential {
  secret: Secret,
}

impl StaticCredential {
  pub const fn new(secret: Secret) -> Self {
    Self { secret }
  }
}

impl CredentialSource for StaticCredential {
  fn resolve(&self) -> Result<Secret, ValidationError> {
    Ok(self.secret.clone())
  }
}

/// A token read from an environment variable at resolution time.
#[derive(Debug, Clone)]
pub struct EnvCredential {
  var: String,
}

impl EnvCredential {
  pub fn new(var: impl Into<String>) -> Self {
    Self { var: var.into() }
  }

  pub fn var(&self) -> &str {
    &self.var
  }
}

impl CredentialSource for EnvCredential {
  fn resolve(&self) -> Result<Secret, ValidationError> {
    match std::env::var(&self.var) {
      Ok(value) if !value.is_empty() => Ok(Secret::new(value)),
      _ => Err(ValidationError::new(
        "apiKey",
        format!("environment variable '{}' is not set", self.var),
      )),
    }
  }
}

/// Build the `Authorization` header value for Basic authentication.
pub fn basic_auth_header(account: &str, secret: &Secret) -> String {
  let encoded = STANDARD.encode(format!("{account}:{}", secret.expose()));
  format!("Basic {encoded}")
}

#[cfg(test)]
mod tests {
  use storybridge_test_utils::EnvVarGuard;

  use super::*;

  #[test]
  fn test_basic_auth_header() {
    let header = basic_auth_header("test_user", &Secret::new("test_token"));
    // test_user:test_token in base64
    assert_eq!(header, "Basic dGVzdF91c2VyOnRlc3RfdG9rZW4=");
  }

  #[test]
  fn test_static_credential() {
    let source = StaticCredential::new(Secret::new("abc"));
    assert_eq!(source.resolve().unwrap().expose(), "abc");
  }

  #[test]
  fn test_env_credential() {
    let guard = EnvVarGuard::new("STORYBRIDGE_TEST_AUTH_TOKEN");
    let source = EnvCredential::new("STORYBRIDGE_TEST_AUTH_TOKEN");

    guard.remove();
    let err = source.resolve().unwrap_err();
    assert_eq!(err.field, "apiKey");
    assert!(err.message.contains("STORYBRIDGE_TEST_AUTH_TOKEN"));

    guard.set("");
    assert!(source.resolve().is_err());

    guard.set("from-env");
    assert_eq!(source.resolve().unwrap().expose(), "from-env");
  }
}
