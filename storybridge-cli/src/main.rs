//! # Storybridge CLI Entry Point
//!
//! Checks Jira credentials, lists stories and exports generated test cases.

use clap::Parser;
use cli::handle_cli;
use storybridge_core::output::print_error;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;
mod clients;

fn main() {
  let cmd = cli::Cli::parse();

  let level = match cmd.verbose {
    0 => tracing::Level::WARN,
    1 => tracing::Level::INFO,
    2 => tracing::Level::DEBUG,
    _ => tracing::Level::TRACE,
  };

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  if let Err(err) = handle_cli(cmd) {
    print_error(&format!("{err:#}"));
    std::process::exit(1);
  }
}
