//! Configuration directory management for testing

use std::path::PathBuf;

use tempfile::TempDir;

use crate::env::EnvVarGuard;

/// Variable read by storybridge to locate its settings directory
pub const CONFIG_DIR_VAR: &str = "STORYBRIDGE_CONFIG_DIR";

/// Points `STORYBRIDGE_CONFIG_DIR` at a fresh temporary directory
pub struct ConfigDirGuard {
  /// The temporary directory backing the settings directory
  pub temp_dir: TempDir,
  env: EnvVarGuard,
}

impl Default for ConfigDirGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl ConfigDirGuard {
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let env = EnvVarGuard::new(CONFIG_DIR_VAR);
    env.set(&temp_dir.path().join("config").to_string_lossy());

    Self { temp_dir, env }
  }

  /// Path the settings directory resolves to while the guard is alive
  pub fn config_dir(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }
}
