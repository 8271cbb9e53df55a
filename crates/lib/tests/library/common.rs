//! Shared fixtures for library integration tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use bindisc_lib::{BindingId, BindingParameter, BindingType, Discovery, KeyValueStore, MemoryRepository};
use serde_json::{Value, json};

pub fn repository() -> Arc<MemoryRepository> {
  Arc::new(
    MemoryRepository::new()
      .with("/app/*.css", &["/app/a.css", "/app/b.css"])
      .with("/app/*.po", &["/app/en.po"])
      .with("/lib/**", &["/lib/x", "/lib/y/z"]),
  )
}

pub fn open<S: KeyValueStore>(store: S) -> Discovery<S> {
  Discovery::new(store, repository()).unwrap()
}

pub fn translations() -> BindingType {
  BindingType::new(
    "thor/translations",
    vec![
      BindingParameter::required("lang").unwrap(),
      BindingParameter::with_default("priority", json!(10)).unwrap(),
    ],
  )
  .unwrap()
}

pub fn params(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
  pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

pub fn ids<S: KeyValueStore>(discovery: &mut Discovery<S>) -> Vec<BindingId> {
  discovery
    .get_bindings()
    .unwrap()
    .into_iter()
    .map(|(id, _)| id)
    .collect()
}

/// Every ID in either index must point at a stored binding with matching
/// query and type.
pub fn assert_index_consistent<S: KeyValueStore>(discovery: &mut Discovery<S>) {
  let type_index: BTreeMap<String, Vec<u64>> =
    serde_json::from_value(discovery.store().get_or("//typeIndex", json!({})).unwrap()).unwrap();
  let query_index: BTreeMap<String, Vec<u64>> =
    serde_json::from_value(discovery.store().get_or("//queryIndex", json!({})).unwrap()).unwrap();

  let mut from_types = Vec::new();
  for (type_name, raw_ids) in &type_index {
    for raw in raw_ids {
      let binding = discovery.get_binding(BindingId(*raw)).unwrap().unwrap();
      assert_eq!(binding.type_name(), type_name);
      from_types.push(*raw);
    }
  }

  for (query, raw_ids) in &query_index {
    for raw in raw_ids {
      let binding = discovery.get_binding(BindingId(*raw)).unwrap().unwrap();
      assert_eq!(binding.query(), query);
    }
  }

  from_types.sort();
  let live: Vec<u64> = ids(discovery).into_iter().map(|id| id.0).collect();
  assert_eq!(from_types, live);
}
