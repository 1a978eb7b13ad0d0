//! # Storybridge Core Library
//!
//! Tracker-agnostic pieces shared by the storybridge crates: the test-case
//! generation schemas, file and environment based settings, and terminal
//! output helpers.

pub mod consts;
pub mod output;
pub mod schemas;
pub mod settings;

// Re-export main types
pub use output::{ColorMode, print_error, print_header, print_info, print_success, print_warning};
pub use schemas::{GenerateRequest, GenerateResponse, SchemaError, TestCase};
pub use settings::{ConfigDirs, JiraSettings, Settings, get_config_dirs};
