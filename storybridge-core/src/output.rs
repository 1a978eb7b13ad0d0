//! # Output Formatting
//!
//! Colored, emoji-prefixed terminal messages plus formatters for the values
//! storybridge prints most: issue keys and HTTP statuses.

use owo_colors::{OwoColorize, Stream, Style};

/// When to color terminal output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Always color
  Always,
  /// Color when the output stream supports it
  Auto,
  /// Never color
  Never,
}

impl ColorMode {
  /// Apply this mode to owo-colors' global override.
  ///
  /// Only output painted through [`paint`] or [`paint_stderr`] honours it.
  pub fn apply(self) {
    match self {
      ColorMode::Always => owo_colors::set_override(true),
      ColorMode::Never => owo_colors::set_override(false),
      ColorMode::Auto => owo_colors::unset_override(),
    }
  }
}

/// Style `text` for stdout, leaving it plain when colors are off
pub fn paint(text: &str, style: Style) -> String {
  text.if_supports_color(Stream::Stdout, |t| t.style(style)).to_string()
}

/// Style `text` for stderr, leaving it plain when colors are off
pub fn paint_stderr(text: &str, style: Style) -> String {
  text.if_supports_color(Stream::Stderr, |t| t.style(style)).to_string()
}

/// Bold `text` for stdout
pub fn emphasize(text: &str) -> String {
  paint(text, Style::new().bold())
}

/// Get an emoji by shortcode, or `default` when the shortcode is unknown
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = get_emoji_or_default("check_mark", "✓");
  println!("{} {}", paint(&check, Style::new().green().bold()), message);
}

/// Print an error message to stderr
pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("cross_mark", "✗");
  eprintln!("{} {}", paint_stderr(&cross, Style::new().red().bold()), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default("warning", "⚠");
  println!("{} {}", paint(&warning, Style::new().yellow().bold()), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information", "ℹ");
  println!("{} {}", paint(&info, Style::new().blue().bold()), message);
}

/// Print a section header
pub fn print_header(header: &str) {
  println!("\n{}", paint(header, Style::new().blue().bold()));
}

pub fn format_issue_key(key: &str) -> String {
  paint(key, Style::new().bright_cyan().bold())
}

pub fn format_url(url: &str) -> String {
  paint(url, Style::new().bright_blue())
}

/// Color an HTTP status by class: 2xx green, 4xx yellow, everything else red
pub fn format_status_code(status: u16) -> String {
  let style = match status {
    200..=299 => Style::new().green(),
    400..=499 => Style::new().yellow(),
    _ => Style::new().red(),
  };
  paint(&status.to_string(), style)
}

/// Shorten `text` to at most `max` characters, marking the cut with `…`
pub fn truncate_text(text: &str, max: usize) -> String {
  let flat = text.replace(['\r', '\n'], " ");
  if flat.chars().count() <= max {
    return flat;
  }
  let mut out: String = flat.chars().take(max.saturating_sub(1)).collect();
  out.push('…');
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_get_emoji_or_default() {
    let result = get_emoji_or_default("check_mark", "✓");
    assert!(!result.is_empty());

    let result = get_emoji_or_default("nonexistent_emoji", "fallback");
    assert_eq!(result, "fallback");
  }

  #[test]
  fn test_never_mode_emits_no_escape_sequences() {
    ColorMode::Never.apply();

    for painted in [
      format_issue_key("PROJ-1"),
      format_url("https://x.atlassian.net"),
      format_status_code(401),
      emphasize("Dev"),
      paint_stderr("failed", Style::new().red().bold()),
    ] {
      assert!(!painted.contains('\u{1b}'), "unexpected escape in {painted:?}");
    }
    assert_eq!(format_issue_key("PROJ-1"), "PROJ-1");
    assert_eq!(format_status_code(502), "502");
  }

  #[test]
  fn test_format_functions() {
    assert!(format_issue_key("PROJ-1").contains("PROJ-1"));
    assert!(format_status_code(200).contains("200"));
    assert!(format_status_code(401).contains("401"));
    assert!(format_status_code(502).contains("502"));
  }

  #[test]
  fn test_truncate_text() {
    assert_eq!(truncate_text("short", 10), "short");
    assert_eq!(truncate_text("line one\nline two", 40), "line one line two");
    assert_eq!(truncate_text("abcdefghij", 5), "abcd…");
    assert_eq!(truncate_text("", 5), "");
  }
}
