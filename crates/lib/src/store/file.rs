//! JSON file backend.
//!
//! # Storage Layout
//!
//! ```text
//! {data_dir}/
//! └── store.json      # one JSON object, key -> value
//! ```
//!
//! The whole object is rewritten after every mutation. Writes go to a
//! temporary file in the same directory which is then renamed over the
//! target, so readers never observe a half-written file.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{KeyValueStore, StoreError};

#[derive(Debug)]
pub struct JsonFileStore {
  path: PathBuf,
  entries: BTreeMap<String, Value>,
}

impl JsonFileStore {
  /// Open the store at `path`.
  ///
  /// A missing file yields an empty store; the file is created on the first
  /// write.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
    let path = path.into();

    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "store file not found, starting empty");
        return Ok(Self {
          path,
          entries: BTreeMap::new(),
        });
      }
      Err(e) => return Err(StoreError::Read(e)),
    };

    let value: Value = serde_json::from_str(&content).map_err(StoreError::Parse)?;
    let entries: BTreeMap<String, Value> = match value {
      Value::Object(map) => map.into_iter().collect(),
      _ => return Err(StoreError::NotAnObject(path)),
    };

    info!(path = %path.display(), entries = entries.len(), "opened store file");
    Ok(Self { path, entries })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn flush(&self) -> Result<(), StoreError> {
    let dir = match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(StoreError::CreateDir)?;

    let content = serde_json::to_string_pretty(&self.entries).map_err(StoreError::Serialize)?;

    let mut temp = NamedTempFile::new_in(&dir).map_err(StoreError::Write)?;
    temp.write_all(content.as_bytes()).map_err(StoreError::Write)?;
    temp.persist(&self.path).map_err(|e| StoreError::Write(e.error))?;

    debug!(path = %self.path.display(), entries = self.entries.len(), "store file written");
    Ok(())
  }
}

impl KeyValueStore for JsonFileStore {
  fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
    self.entries.insert(key.to_string(), value);
    self.flush()
  }

  fn remove(&mut self, key: &str) -> Result<(), StoreError> {
    if self.entries.remove(key).is_some() {
      self.flush()?;
    }
    Ok(())
  }

  fn exists(&self, key: &str) -> Result<bool, StoreError> {
    Ok(self.entries.contains_key(key))
  }

  fn clear(&mut self) -> Result<(), StoreError> {
    self.entries.clear();
    self.flush()
  }

  fn keys(&self) -> Result<Vec<String>, StoreError> {
    Ok(self.entries.keys().cloned().collect())
  }
}
