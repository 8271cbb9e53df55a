//! Mapping of bindings, types and index snapshots onto a key-value store.
//!
//! # Key Layout
//!
//! ```text
//! //typeIndex    { "<type>": [<id>, ...], ... }
//! //queryIndex   { "<query>": [<id>, ...], ... }
//! //nextId       <id>
//! <id>           { "query": ..., "type_name": ..., "parameter_values": {...}, "language": ... }
//! <type>         { "name": ..., "parameters": [...] }
//! ```
//!
//! Type names start with a letter, so they never collide with the decimal
//! binding keys or the reserved `//` keys.
//!
//! Every write method updates the backend immediately. There is no rollback:
//! if a write fails after the in-memory index changed, the two diverge.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::binding::{BindingId, ResourceBinding};
use crate::binding_type::BindingType;
use crate::consts::{NEXT_ID_KEY, QUERY_INDEX_KEY, TYPE_INDEX_KEY};
use crate::error::{DiscoveryError, Result};
use crate::index::{BindingIndex, IdIndex, IdSet};
use crate::store::KeyValueStore;

/// The stored form of a binding.
///
/// Only explicit parameter values are kept; defaults come from the type when
/// the binding is rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBinding {
  pub query: String,
  pub type_name: String,
  #[serde(default)]
  pub parameter_values: BTreeMap<String, Value>,
  pub language: String,
}

impl From<&ResourceBinding> for StoredBinding {
  fn from(binding: &ResourceBinding) -> Self {
    Self {
      query: binding.query().to_string(),
      type_name: binding.type_name().to_string(),
      parameter_values: binding.explicit_parameter_values().clone(),
      language: binding.language().to_string(),
    }
  }
}

#[derive(Debug)]
pub struct PersistenceAdapter<S> {
  store: S,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
  pub fn new(store: S) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn into_store(self) -> S {
    self.store
  }

  fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
    match self.store.get(key)? {
      Some(value) => serde_json::from_value(value)
        .map(Some)
        .map_err(|source| DiscoveryError::Deserialize {
          key: key.to_string(),
          source,
        }),
      None => Ok(None),
    }
  }

  fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
    let value = serde_json::to_value(value).map_err(|source| DiscoveryError::Serialize {
      key: key.to_string(),
      source,
    })?;
    self.store.set(key, value)?;
    Ok(())
  }

  /// Rebuild the index from the stored snapshots. Missing snapshots mean an
  /// empty index.
  pub fn load_index(&self) -> Result<BindingIndex> {
    let type_index: IdIndex = self.read(TYPE_INDEX_KEY)?.unwrap_or_default();
    let query_index: IdIndex = self.read(QUERY_INDEX_KEY)?.unwrap_or_default();
    let next_id: u64 = self.read(NEXT_ID_KEY)?.unwrap_or(1);

    debug!(
      types = type_index.len(),
      queries = query_index.len(),
      next_id = next_id,
      "loaded index snapshots"
    );
    let index = BindingIndex::from_snapshots(type_index, query_index, next_id)?;
    if index.peek_next_id().0 != next_id {
      warn!(
        stored = next_id,
        raised = index.peek_next_id().0,
        "stored id counter is behind the indices"
      );
    }
    Ok(index)
  }

  /// Fetch the stored form of binding `id`.
  ///
  /// Callers only ask for IDs they found in an index or probed with
  /// [`binding_exists`](Self::binding_exists), so a missing value is a
  /// [`DiscoveryError::StorageConsistency`] violation.
  pub fn load_binding(&self, id: BindingId) -> Result<StoredBinding> {
    debug!(id = %id, "loading binding");
    self
      .read(&id.key())?
      .ok_or(DiscoveryError::StorageConsistency { id })
  }

  pub fn binding_exists(&self, id: BindingId) -> Result<bool> {
    Ok(self.store.exists(&id.key())?)
  }

  pub fn load_type(&self, name: &str) -> Result<BindingType> {
    debug!(type_name = %name, "loading binding type");
    self
      .read(name)?
      .ok_or_else(|| DiscoveryError::NoSuchType(name.to_string()))
  }

  fn write_type_index(&mut self, index: &BindingIndex) -> Result<()> {
    self.write(TYPE_INDEX_KEY, index.type_index())
  }

  fn write_indices(&mut self, index: &BindingIndex) -> Result<()> {
    self.write(QUERY_INDEX_KEY, index.query_index())?;
    self.write_type_index(index)
  }

  /// Store a freshly inserted binding together with the advanced counter and
  /// both index snapshots.
  pub fn persist_insert(&mut self, id: BindingId, binding: &StoredBinding, index: &BindingIndex) -> Result<()> {
    self.write(&id.key(), binding)?;
    self.write(NEXT_ID_KEY, &index.peek_next_id())?;
    self.write_indices(index)
  }

  pub fn persist_remove(&mut self, id: BindingId, index: &BindingIndex) -> Result<()> {
    self.store.remove(&id.key())?;
    self.write_indices(index)
  }

  /// Remove several bindings, writing the snapshots once at the end.
  pub fn persist_remove_batch(&mut self, ids: &IdSet, index: &BindingIndex) -> Result<()> {
    if ids.is_empty() {
      return Ok(());
    }
    for id in ids {
      self.store.remove(&id.key())?;
    }
    self.write_indices(index)
  }

  pub fn persist_type_define(&mut self, binding_type: &BindingType, index: &BindingIndex) -> Result<()> {
    self.write(binding_type.name(), binding_type)?;
    self.write_type_index(index)
  }

  pub fn persist_type_undefine(&mut self, name: &str, index: &BindingIndex) -> Result<()> {
    self.store.remove(name)?;
    self.write_indices(index)
  }

  /// Wipe the backend, counter included.
  pub fn clear(&mut self) -> Result<()> {
    self.store.clear()?;
    Ok(())
  }
}
