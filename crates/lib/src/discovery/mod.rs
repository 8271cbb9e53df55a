//! The discovery facade.
//!
//! [`Discovery`] owns one key-value backend together with the resident
//! state decoded from it: the binding index, the type registry and a cache
//! of bindings. Every mutating call writes through to the backend before it
//! returns. Read calls may fill the caches as a side effect.
//!
//! A single writer is assumed. Nothing here locks, and a failed backend
//! write leaves the resident state ahead of the stored state.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::binding::{BindingFilter, BindingId, ResourceBinding};
use crate::binding_type::registry::TypeRegistry;
use crate::binding_type::{BindingType, IntoBindingType};
use crate::index::{BindingIndex, IdSet};
use crate::persistence::{PersistenceAdapter, StoredBinding};
use crate::resource::ResourceRepository;
use crate::store::KeyValueStore;

pub use crate::error::{DiscoveryError, Result};

/// A binding together with the ID it was stored under.
pub type BindingEntry = (BindingId, ResourceBinding);

pub struct Discovery<S> {
  persistence: PersistenceAdapter<S>,
  index: BindingIndex,
  types: TypeRegistry,
  bindings: BTreeMap<BindingId, ResourceBinding>,
  repository: Arc<dyn ResourceRepository>,
}

impl<S: KeyValueStore> Discovery<S> {
  /// Open a discovery over `store`, loading its index snapshots.
  ///
  /// Bindings loaded from the store resolve their resources through
  /// `repository`.
  pub fn new(store: S, repository: Arc<dyn ResourceRepository>) -> Result<Self> {
    let persistence = PersistenceAdapter::new(store);
    let index = persistence.load_index()?;

    info!(
      types = index.type_index().len(),
      bindings = index.len(),
      next_id = %index.peek_next_id(),
      "opened discovery"
    );

    Ok(Self {
      persistence,
      index,
      types: TypeRegistry::new(),
      bindings: BTreeMap::new(),
      repository,
    })
  }

  pub fn repository(&self) -> &Arc<dyn ResourceRepository> {
    &self.repository
  }

  pub fn store(&self) -> &S {
    self.persistence.store()
  }

  /// Give the backend back, dropping all resident state.
  pub fn into_store(self) -> S {
    self.persistence.into_store()
  }

  /// Define a binding type. A bare name defines a type without parameters.
  pub fn define_type(&mut self, binding_type: impl IntoBindingType) -> Result<Arc<BindingType>> {
    let binding_type = binding_type.into_binding_type()?;
    let name = binding_type.name().to_string();

    if self.index.is_type_defined(&name) {
      return Err(DiscoveryError::DuplicateType(name));
    }

    info!(type_name = %name, parameters = binding_type.parameters().len(), "defining binding type");
    self.index.define_type(&name);
    let shared = self.types.insert(binding_type);
    self.persistence.persist_type_define(&shared, &self.index)?;
    Ok(shared)
  }

  /// Remove a binding type and every binding of that type. Returns the
  /// number of bindings removed.
  pub fn undefine_type(&mut self, name: &str) -> Result<usize> {
    if !self.index.is_type_defined(name) {
      return Err(DiscoveryError::NoSuchType(name.to_string()));
    }

    let removed = self.remove_bindings(&BindingFilter::new().type_name(name))?;

    info!(type_name = %name, removed = removed, "undefining binding type");
    self.index.undefine_type(name);
    self.types.remove(name);
    self.persistence.persist_type_undefine(name, &self.index)?;
    Ok(removed)
  }

  pub fn get_defined_type(&mut self, name: &str) -> Result<Arc<BindingType>> {
    if !self.index.is_type_defined(name) {
      return Err(DiscoveryError::NoSuchType(name.to_string()));
    }
    if let Some(binding_type) = self.types.get(name) {
      return Ok(binding_type);
    }

    let binding_type = self.persistence.load_type(name)?;
    Ok(self.types.insert(binding_type))
  }

  /// Whether `name` is defined. Does not load the type.
  pub fn is_type_defined(&self, name: &str) -> bool {
    self.index.is_type_defined(name)
  }

  /// All defined types, ordered by name.
  pub fn get_defined_types(&mut self) -> Result<Vec<Arc<BindingType>>> {
    let names: Vec<String> = self.index.type_names().map(str::to_string).collect();
    names.iter().map(|name| self.get_defined_type(name)).collect()
  }

  /// Store `binding` under the next free ID.
  ///
  /// The binding's type must be defined and identical to the definition.
  pub fn insert_binding(&mut self, binding: ResourceBinding) -> Result<BindingId> {
    let defined = self.get_defined_type(binding.type_name())?;
    if *defined != **binding.binding_type() {
      return Err(DiscoveryError::InvalidArgument(format!(
        "binding type {} differs from its definition",
        binding.type_name()
      )));
    }

    let id = self.index.next_id()?;
    self.index.insert(id, binding.query(), binding.type_name());
    self
      .persistence
      .persist_insert(id, &StoredBinding::from(&binding), &self.index)?;

    info!(
      id = %id,
      query = %binding.query(),
      type_name = %binding.type_name(),
      language = %binding.language(),
      "inserted binding"
    );
    self.bindings.insert(id, binding);
    Ok(id)
  }

  /// Bind `query` to `type_name` with a lazily resolved binding.
  pub fn bind(
    &mut self,
    query: &str,
    type_name: &str,
    parameter_values: BTreeMap<String, Value>,
    language: Option<&str>,
  ) -> Result<BindingId> {
    let binding_type = self.get_defined_type(type_name)?;
    let mut binding = ResourceBinding::lazy(query, binding_type, parameter_values, Arc::clone(&self.repository))?;
    if let Some(language) = language {
      binding = binding.with_language(language)?;
    }
    self.insert_binding(binding)
  }

  /// The binding stored under `id`, or `None` if there is none.
  pub fn get_binding(&mut self, id: BindingId) -> Result<Option<ResourceBinding>> {
    if !self.index.contains(id) {
      return Ok(None);
    }
    self.resident_binding(id).map(Some)
  }

  /// Every stored binding in ascending ID order.
  pub fn get_bindings(&mut self) -> Result<Vec<BindingEntry>> {
    let end = self.index.peek_next_id().0;
    let mut entries = Vec::new();

    for raw in 1..end {
      let id = BindingId(raw);
      if !self.bindings.contains_key(&id) && !self.persistence.binding_exists(id)? {
        continue;
      }
      entries.push((id, self.resident_binding(id)?));
    }

    Ok(entries)
  }

  pub fn binding_count(&self) -> usize {
    self.index.len()
  }

  /// Bindings matching `filter`, in ascending ID order.
  pub fn find_bindings(&mut self, filter: &BindingFilter) -> Result<Vec<BindingEntry>> {
    self.check_filter(filter)?;

    let mut found = Vec::new();
    for id in self.candidates(filter) {
      let binding = self.resident_binding(id)?;
      if filter.matches(&binding) {
        found.push((id, binding));
      }
    }
    Ok(found)
  }

  pub fn find_bindings_by_query(&mut self, query: &str) -> Result<Vec<BindingEntry>> {
    self.find_bindings(&BindingFilter::new().query(query))
  }

  pub fn find_bindings_by_type(&mut self, type_name: &str) -> Result<Vec<BindingEntry>> {
    self.find_bindings(&BindingFilter::new().type_name(type_name))
  }

  /// Whether any binding matches `filter`.
  pub fn has_bindings(&mut self, filter: &BindingFilter) -> Result<bool> {
    self.check_filter(filter)?;

    for id in self.candidates(filter) {
      if filter.parameters.is_empty() || filter.matches(&self.resident_binding(id)?) {
        return Ok(true);
      }
    }
    Ok(false)
  }

  /// Remove the binding stored under `id`. Returns whether one existed.
  pub fn remove_binding(&mut self, id: BindingId) -> Result<bool> {
    if !self.index.contains(id) {
      debug!(id = %id, "no binding to remove");
      return Ok(false);
    }

    let binding = self.resident_binding(id)?;
    self.index.remove(id, binding.query(), binding.type_name());
    self.bindings.remove(&id);
    self.persistence.persist_remove(id, &self.index)?;

    info!(id = %id, query = %binding.query(), type_name = %binding.type_name(), "removed binding");
    Ok(true)
  }

  /// Remove every binding matching `filter`. Returns the number removed.
  pub fn remove_bindings(&mut self, filter: &BindingFilter) -> Result<usize> {
    self.check_filter(filter)?;

    let mut doomed = Vec::new();
    for id in self.candidates(filter) {
      let keys = match (&filter.query, &filter.type_name) {
        (Some(query), Some(type_name)) if filter.parameters.is_empty() => (query.clone(), type_name.clone()),
        _ => {
          let binding = self.resident_binding(id)?;
          if !filter.matches(&binding) {
            continue;
          }
          (binding.query().to_string(), binding.type_name().to_string())
        }
      };
      doomed.push((id, keys));
    }

    let mut ids = IdSet::new();
    for (id, (query, type_name)) in &doomed {
      self.index.remove(*id, query, type_name);
      self.bindings.remove(id);
      ids.insert(*id);
    }
    self.persistence.persist_remove_batch(&ids, &self.index)?;

    info!(
      query = ?filter.query,
      type_name = ?filter.type_name,
      parameters = filter.parameters.len(),
      removed = ids.len(),
      "removed bindings"
    );
    Ok(ids.len())
  }

  pub fn remove_bindings_by_query(&mut self, query: &str) -> Result<usize> {
    self.remove_bindings(&BindingFilter::new().query(query))
  }

  pub fn remove_bindings_by_type(&mut self, type_name: &str) -> Result<usize> {
    self.remove_bindings(&BindingFilter::new().type_name(type_name))
  }

  pub fn remove_bindings_by_query_and_type(&mut self, query: &str, type_name: &str) -> Result<usize> {
    self.remove_bindings(&BindingFilter::new().query(query).type_name(type_name))
  }

  /// Remove all types and bindings and wipe the backend. IDs start over at 1.
  pub fn clear(&mut self) -> Result<()> {
    info!(
      types = self.index.type_index().len(),
      bindings = self.index.len(),
      "clearing discovery"
    );
    self.persistence.clear()?;
    self.index = BindingIndex::new();
    self.types.clear();
    self.bindings.clear();
    Ok(())
  }

  fn check_filter(&mut self, filter: &BindingFilter) -> Result<()> {
    filter.validate()?;

    if let Some(type_name) = &filter.type_name {
      let binding_type = self.get_defined_type(type_name)?;
      for name in filter.parameters.keys() {
        binding_type.parameter(name)?;
      }
    }
    Ok(())
  }

  fn candidates(&self, filter: &BindingFilter) -> IdSet {
    self
      .index
      .candidates(filter.query.as_deref(), filter.type_name.as_deref())
  }

  /// Return the cached binding for `id`, loading it from the backend on a
  /// miss. The loaded binding resolves lazily.
  fn resident_binding(&mut self, id: BindingId) -> Result<ResourceBinding> {
    if let Some(binding) = self.bindings.get(&id) {
      return Ok(binding.clone());
    }

    let stored = self.persistence.load_binding(id)?;
    let binding_type = self.get_defined_type(&stored.type_name)?;
    let binding = ResourceBinding::lazy(
      stored.query,
      binding_type,
      stored.parameter_values,
      Arc::clone(&self.repository),
    )?
    .with_language(stored.language)?;

    self.bindings.insert(id, binding.clone());
    Ok(binding)
  }
}
