use std::collections::BTreeMap;

use bindisc_lib::{BindingId, Discovery, DiscoveryError, JsonFileStore, KeyValueStore, MemoryStore};
use serde_json::json;
use tempfile::TempDir;

use super::common::{open, params, repository, translations};

#[test]
fn store_layout_uses_reserved_keys() {
  let mut d = open(MemoryStore::new());
  d.define_type(translations()).unwrap();
  d.bind("/app/*.po", "thor/translations", params(&[("lang", json!("en"))]), None)
    .unwrap();

  let store = d.into_store();
  assert_eq!(
    store.keys().unwrap(),
    vec!["//nextId", "//queryIndex", "//typeIndex", "1", "thor/translations"]
  );
  assert_eq!(store.get("//nextId").unwrap(), Some(json!(2)));
  assert_eq!(store.get("//typeIndex").unwrap(), Some(json!({"thor/translations": [1]})));
  assert_eq!(store.get("//queryIndex").unwrap(), Some(json!({"/app/*.po": [1]})));
  assert_eq!(
    store.get("1").unwrap(),
    Some(json!({
      "query": "/app/*.po",
      "type_name": "thor/translations",
      "parameter_values": {"lang": "en"},
      "language": "glob"
    }))
  );
}

#[test]
fn indexed_but_missing_binding_is_fatal() {
  let mut d = open(MemoryStore::new());
  d.define_type("thor/css").unwrap();
  let id = d.bind("/app/*.css", "thor/css", BTreeMap::new(), None).unwrap();

  let mut store = d.into_store();
  store.remove(&id.key()).unwrap();

  let mut fresh = open(store);
  match fresh.get_binding(id) {
    Err(DiscoveryError::StorageConsistency { id: missing }) => assert_eq!(missing, id),
    other => panic!("expected StorageConsistency, got: {:?}", other),
  }
  assert!(matches!(
    fresh.find_bindings_by_type("thor/css"),
    Err(DiscoveryError::StorageConsistency { .. })
  ));
}

#[test]
fn binding_with_vanished_type_object_fails() {
  let mut d = open(MemoryStore::new());
  d.define_type("thor/css").unwrap();
  let id = d.bind("/app/*.css", "thor/css", BTreeMap::new(), None).unwrap();

  let mut store = d.into_store();
  store.remove("thor/css").unwrap();

  let mut fresh = open(store);
  assert!(fresh.is_type_defined("thor/css"));
  assert!(matches!(fresh.get_binding(id), Err(DiscoveryError::NoSuchType(_))));
}

#[test]
fn tombstoned_ids_are_skipped() {
  let mut d = open(MemoryStore::new());
  d.define_type("thor/css").unwrap();
  for _ in 0..4 {
    d.bind("/app/*.css", "thor/css", BTreeMap::new(), None).unwrap();
  }
  d.remove_binding(BindingId(1)).unwrap();
  d.remove_binding(BindingId(3)).unwrap();

  let mut fresh = open(d.into_store());
  let ids: Vec<_> = fresh.get_bindings().unwrap().into_iter().map(|(id, _)| id).collect();
  assert_eq!(ids, vec![BindingId(2), BindingId(4)]);
}

#[test]
fn file_store_reflects_every_mutation() {
  let temp = TempDir::new().unwrap();
  let path = temp.path().join("data").join("store.json");

  let mut d = open(JsonFileStore::open(&path).unwrap());
  d.define_type("thor/css").unwrap();
  let id = d.bind("/app/*.css", "thor/css", BTreeMap::new(), None).unwrap();

  let on_disk: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
  assert_eq!(on_disk["//typeIndex"], json!({"thor/css": [1]}));
  assert_eq!(on_disk["1"]["query"], json!("/app/*.css"));

  d.remove_binding(id).unwrap();
  let on_disk: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
  assert!(on_disk.get("1").is_none());
  assert_eq!(on_disk["//queryIndex"], json!({}));
  assert_eq!(on_disk["//nextId"], json!(2));
}

#[test]
fn corrupt_binding_value_is_decode_error() {
  let mut d = open(MemoryStore::new());
  d.define_type("thor/css").unwrap();
  let id = d.bind("/app/*.css", "thor/css", BTreeMap::new(), None).unwrap();

  let mut store = d.into_store();
  store.set(&id.key(), json!({"query": 5})).unwrap();

  let mut fresh = open(store);
  assert!(matches!(
    fresh.get_binding(id),
    Err(DiscoveryError::Deserialize { .. })
  ));
}

#[test]
fn indexed_id_at_counter_limit_fails_to_open() {
  let mut store = MemoryStore::new();
  store.set("//typeIndex", json!({"thor/css": [u64::MAX]})).unwrap();

  assert!(matches!(
    Discovery::new(store, repository()),
    Err(DiscoveryError::IdExhausted(id)) if id == u64::MAX
  ));
}

#[test]
fn exhausted_counter_rejects_insert_and_leaves_store_untouched() {
  let mut d = open(MemoryStore::new());
  d.define_type("thor/css").unwrap();

  let mut store = d.into_store();
  store.set("//nextId", json!(u64::MAX)).unwrap();

  let mut fresh = open(store);
  assert!(matches!(
    fresh.bind("/app/*.css", "thor/css", BTreeMap::new(), None),
    Err(DiscoveryError::IdExhausted(_))
  ));
  assert_eq!(fresh.binding_count(), 0);

  let store = fresh.into_store();
  assert_eq!(store.get("//nextId").unwrap(), Some(json!(u64::MAX)));
  assert_eq!(store.get("//typeIndex").unwrap(), Some(json!({"thor/css": []})));
}
