mod bind;
mod clear;
mod find;
mod types;
mod unbind;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use bindisc_lib::{Discovery, JsonFileStore};
use serde_json::Value;
use tracing::debug;

use crate::repository::FsRepository;

pub use bind::cmd_bind;
pub use clear::cmd_clear;
pub use find::cmd_find;
pub use types::{TypeCommand, cmd_type};
pub use unbind::{UnbindArgs, cmd_unbind};

/// Open the discovery store at `store`, resolving queries against files
/// under `root`.
pub fn open_discovery(store: &Path, root: &Path) -> Result<Discovery<JsonFileStore>> {
  debug!(store = %store.display(), root = %root.display(), "opening store");
  let backend =
    JsonFileStore::open(store).with_context(|| format!("Failed to open store: {}", store.display()))?;
  let repository = Arc::new(FsRepository::new(root));
  Discovery::new(backend, repository).with_context(|| format!("Failed to load store: {}", store.display()))
}

/// Parse a `name=value` argument. The value is read as JSON and falls back
/// to a plain string when it is not valid JSON.
pub fn parse_key_value(arg: &str) -> Result<(String, Value)> {
  let (name, raw) = arg
    .split_once('=')
    .ok_or_else(|| anyhow!("Expected name=value, got: {}", arg))?;
  if name.is_empty() {
    return Err(anyhow!("Missing parameter name in: {}", arg));
  }
  Ok((name.to_string(), parse_json_value(raw)))
}

pub fn parse_json_value(raw: &str) -> Value {
  serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
