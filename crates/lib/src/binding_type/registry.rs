//! Resident binding types.
//!
//! The registry only caches decoded type objects. Whether a type is
//! defined is decided by the type index; a defined type may be absent here
//! until it is first requested and loaded from the backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::BindingType;

#[derive(Debug, Default)]
pub struct TypeRegistry {
  types: BTreeMap<String, Arc<BindingType>>,
}

impl TypeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, name: &str) -> Option<Arc<BindingType>> {
    self.types.get(name).cloned()
  }

  /// Cache `binding_type` under its name, returning the shared handle.
  pub fn insert(&mut self, binding_type: BindingType) -> Arc<BindingType> {
    let shared = Arc::new(binding_type);
    self.types.insert(shared.name().to_string(), Arc::clone(&shared));
    shared
  }

  pub fn remove(&mut self, name: &str) -> Option<Arc<BindingType>> {
    self.types.remove(name)
  }

  pub fn clear(&mut self) {
    self.types.clear();
  }
}
