use std::path::Path;

use anyhow::Result;
use tracing::info;

use super::open_discovery;
use crate::output::{print_info, print_success};
use crate::prompts::confirm;

pub fn cmd_clear(force: bool, store: &Path, root: &Path) -> Result<()> {
  let mut discovery = open_discovery(store, root)?;
  let bindings = discovery.binding_count();
  let types = discovery.get_defined_types()?.len();

  if !confirm(
    &format!("Remove {} binding(s) and {} type(s) from {}?", bindings, types, store.display()),
    force,
  )? {
    print_info("Aborted");
    return Ok(());
  }

  discovery.clear()?;
  info!(store = %store.display(), "store cleared");
  print_success(&format!("Cleared {} binding(s) and {} type(s)", bindings, types));
  Ok(())
}
