//! Environment variable management for testing
//!
//! Each guard owns one variable: it records the value present at creation and
//! puts it back when dropped, so tests can set or clear credentials freely.

use std::env;

/// Saves one environment variable and restores it on drop
pub struct EnvVarGuard {
  name: String,
  original: Option<String>,
}

impl EnvVarGuard {
  /// Start guarding `name` without changing its current value
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_string(),
      original: env::var(name).ok(),
    }
  }

  /// Name of the guarded variable
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Set the guarded variable for the rest of the test
  pub fn set(&self, value: &str) {
    unsafe {
      env::set_var(&self.name, value);
    }
  }

  /// Clear the guarded variable for the rest of the test
  pub fn remove(&self) {
    unsafe {
      env::remove_var(&self.name);
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    match &self.original {
      Some(val) => unsafe {
        env::set_var(&self.name, val);
      },
      None => unsafe {
        env::remove_var(&self.name);
      },
    }
  }
}
