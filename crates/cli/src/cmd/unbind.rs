use std::path::Path;

use anyhow::{Context, Result, bail};
use bindisc_lib::{BindingFilter, BindingId};

use super::{open_discovery, parse_key_value};
use crate::output::{print_stat, print_success, print_warning};

/// Criteria for `bindisc unbind`. An explicit `id` takes precedence and the
/// remaining fields must then be empty.
#[derive(Debug, Default)]
pub struct UnbindArgs {
  pub id: Option<u64>,
  pub query: Option<String>,
  pub type_name: Option<String>,
  pub set: Vec<String>,
}

impl UnbindArgs {
  fn filter(&self) -> Result<BindingFilter> {
    let mut filter = BindingFilter::new();
    if let Some(query) = &self.query {
      filter = filter.query(query.as_str());
    }
    if let Some(type_name) = &self.type_name {
      filter = filter.type_name(type_name.as_str());
    }
    for arg in &self.set {
      let (name, value) = parse_key_value(arg)?;
      filter = filter.parameter(name, value);
    }
    Ok(filter)
  }
}

pub fn cmd_unbind(args: UnbindArgs, store: &Path, root: &Path) -> Result<()> {
  let mut discovery = open_discovery(store, root)?;

  if let Some(raw) = args.id {
    let id = BindingId(raw);
    if discovery.remove_binding(id)? {
      print_success(&format!("Removed binding {}", id));
    } else {
      print_warning(&format!("No binding with id {}", id));
    }
    return Ok(());
  }

  let filter = args.filter()?;
  if filter == BindingFilter::new() {
    bail!("Refusing to remove every binding; pass --query, --type or --set (use `clear` to wipe the store)");
  }

  let removed = discovery
    .remove_bindings(&filter)
    .context("Failed to remove bindings")?;

  print_success("Removed matching bindings");
  print_stat("Bindings removed", &removed.to_string());
  Ok(())
}
