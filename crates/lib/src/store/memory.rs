use std::collections::BTreeMap;

use serde_json::Value;

use super::{KeyValueStore, StoreError};

/// In-memory backend. Contents are lost when the value is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
  entries: BTreeMap<String, Value>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
    self.entries.insert(key.to_string(), value);
    Ok(())
  }

  fn remove(&mut self, key: &str) -> Result<(), StoreError> {
    self.entries.remove(key);
    Ok(())
  }

  fn exists(&self, key: &str) -> Result<bool, StoreError> {
    Ok(self.entries.contains_key(key))
  }

  fn clear(&mut self) -> Result<(), StoreError> {
    self.entries.clear();
    Ok(())
  }

  fn keys(&self) -> Result<Vec<String>, StoreError> {
    Ok(self.entries.keys().cloned().collect())
  }
}
