//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored status
//! messages, JSON dumps and short labels for bindings.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{AnsiColors, OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

/// Render a JSON value compactly for one-line listings. Strings print
/// without quotes.
pub fn format_value(value: &serde_json::Value) -> String {
  match value {
    serde_json::Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// Status lines on stdout color the symbol only; on stderr the message is
/// colored as well.
fn status(to_stderr: bool, symbol: &str, color: AnsiColors, message: &str) {
  if to_stderr {
    eprintln!(
      "{} {}",
      symbol.if_supports_color(Stream::Stderr, |s| s.color(color)),
      message.if_supports_color(Stream::Stderr, |s| s.color(color))
    );
  } else {
    println!(
      "{} {}",
      symbol.if_supports_color(Stream::Stdout, |s| s.color(color)),
      message
    );
  }
}

pub fn print_success(message: &str) {
  status(false, symbols::SUCCESS, AnsiColors::Green, message);
}

pub fn print_info(message: &str) {
  status(false, symbols::INFO, AnsiColors::Blue, message);
}

pub fn print_warning(message: &str) {
  status(true, symbols::WARNING, AnsiColors::Yellow, message);
}

pub fn print_error(message: &str) {
  status(true, symbols::ERROR, AnsiColors::Red, message);
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
