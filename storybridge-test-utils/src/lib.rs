//! Test utilities shared across the storybridge workspace
//!
//! - Single environment variable overrides ([`EnvVarGuard`])
//! - Isolated settings directories ([`ConfigDirGuard`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod config;
pub mod env;

pub use config::ConfigDirGuard;
pub use env::EnvVarGuard;
