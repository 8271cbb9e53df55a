//! `bindisc find`: list bindings matching a query, a type or both.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use bindisc_lib::{BindingFilter, BindingId, Resource, ResourceBinding};
use serde::Serialize;
use serde_json::Value;

use super::{open_discovery, parse_key_value};
use crate::output::{OutputFormat, format_value, print_info, print_json, print_stat, symbols};

#[derive(Debug, Serialize)]
struct BindingView {
  id: BindingId,
  query: String,
  type_name: String,
  language: String,
  parameters: BTreeMap<String, Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  resources: Option<Vec<Resource>>,
}

impl BindingView {
  fn new(id: BindingId, binding: &ResourceBinding, resolve: bool) -> Result<Self> {
    let resources = if resolve {
      let resources = binding
        .resources()
        .with_context(|| format!("Failed to resolve binding {}", id))?;
      Some(resources)
    } else {
      None
    };

    Ok(Self {
      id,
      query: binding.query().to_string(),
      type_name: binding.type_name().to_string(),
      language: binding.language().to_string(),
      parameters: binding.parameter_values(),
      resources,
    })
  }
}

pub fn cmd_find(
  query: Option<String>,
  type_name: Option<String>,
  set: &[String],
  resolve: bool,
  output: OutputFormat,
  store: &Path,
  root: &Path,
) -> Result<()> {
  let mut filter = BindingFilter::new();
  if let Some(query) = query {
    filter = filter.query(query);
  }
  if let Some(type_name) = type_name {
    filter = filter.type_name(type_name);
  }
  for arg in set {
    let (name, value) = parse_key_value(arg)?;
    filter = filter.parameter(name, value);
  }

  let mut discovery = open_discovery(store, root)?;
  let found = discovery.find_bindings(&filter).context("Failed to find bindings")?;

  let views = found
    .iter()
    .map(|(id, binding)| BindingView::new(*id, binding, resolve))
    .collect::<Result<Vec<_>>>()?;

  if output.is_json() {
    return print_json(&views);
  }

  if views.is_empty() {
    print_info("No bindings found");
    return Ok(());
  }

  for view in &views {
    println!("{:>4}  {} {} {}", view.id.0, view.query, symbols::ARROW, view.type_name);
    for (name, value) in &view.parameters {
      print_stat(name, &format_value(value));
    }
    if let Some(resources) = &view.resources {
      for resource in resources {
        println!("      {}", resource);
      }
    }
  }

  Ok(())
}
