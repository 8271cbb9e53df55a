use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use super::{open_discovery, parse_key_value};
use crate::output::{print_stat, print_success, symbols};

pub fn cmd_bind(
  query: &str,
  type_name: &str,
  set: &[String],
  language: Option<&str>,
  store: &Path,
  root: &Path,
) -> Result<()> {
  let mut parameter_values = BTreeMap::new();
  for arg in set {
    let (name, value) = parse_key_value(arg)?;
    parameter_values.insert(name, value);
  }

  let mut discovery = open_discovery(store, root)?;
  let id = discovery
    .bind(query, type_name, parameter_values, language)
    .with_context(|| format!("Failed to bind {} to {}", query, type_name))?;

  print_success(&format!("Bound {} {} {}", query, symbols::ARROW, type_name));
  print_stat("Id", &id.to_string());
  Ok(())
}
