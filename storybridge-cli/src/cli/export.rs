//! # Export Command
//!
//! Writes a generation response to disk as JSON, CSV or XLSX.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use storybridge_core::GenerateResponse;
use storybridge_core::output::print_success;
use storybridge_export::{ExportFormat, write_to_dir};

/// Arguments for the export command
#[derive(Args)]
pub struct ExportArgs {
  /// Generation response to export (JSON)
  #[arg(long, short = 'i', value_name = "FILE")]
  pub input: PathBuf,

  /// Document format: json, csv or xlsx
  #[arg(long, short = 'f', default_value = "json")]
  pub format: ExportFormat,

  /// Directory the document is written to
  #[arg(long, short = 'o', value_name = "DIR", default_value = ".")]
  pub output: PathBuf,
}

/// Handle the export command
pub fn handle_export_command(args: ExportArgs) -> Result<()> {
  let (path, count) = export_file(&args.input, args.format, &args.output)?;
  print_success(&format!("Exported {count} test cases to {}", path.display()));
  Ok(())
}

fn export_file(input: &Path, format: ExportFormat, output: &Path) -> Result<(PathBuf, usize)> {
  let text = fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;
  let response =
    GenerateResponse::from_json(&text).with_context(|| format!("{} is not a generation response", input.display()))?;

  fs::create_dir_all(output).with_context(|| format!("Failed to create {}", output.display()))?;
  let path = write_to_dir(output, &response, format)?;

  Ok((path, response.cases.len()))
}
