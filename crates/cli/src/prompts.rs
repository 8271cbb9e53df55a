//! Interactive confirmation for destructive commands.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Result, bail};

/// Ask `message` on stderr and read the answer from stdin. `force` skips
/// the prompt. Fails when either stream is not a terminal.
pub fn confirm(message: &str, force: bool) -> Result<bool> {
  if force {
    return Ok(true);
  }

  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!("Cannot prompt for confirmation in non-interactive mode. Use --force to proceed.");
  }

  ask(message, &mut io::stdin().lock(), &mut io::stderr())
}

fn ask(message: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
  write!(output, "{} [y/N] ", message)?;
  output.flush()?;

  let mut answer = String::new();
  input.read_line(&mut answer)?;

  Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
