use predicates::prelude::*;
use serde_json::json;

use super::common::TestEnv;

#[test]
fn test_type_list_empty() {
  let env = TestEnv::empty();
  let stdout = env.run(&["type", "list"]);
  assert!(stdout.contains("No types defined"));
}

#[test]
fn test_type_define_persists_parameters() {
  let env = TestEnv::empty();
  env.run(&[
    "type",
    "define",
    "thor/translations",
    "--required",
    "lang",
    "--param",
    "priority=10",
    "--param",
    "note",
  ]);

  let store = env.store_json();
  assert_eq!(store["//typeIndex"], json!({"thor/translations": []}));
  assert_eq!(
    store["thor/translations"],
    json!({
      "name": "thor/translations",
      "parameters": [
        {"name": "lang", "required": true},
        {"name": "note", "required": false},
        {"name": "priority", "required": false, "default": 10}
      ]
    })
  );

  let listed: serde_json::Value = serde_json::from_str(&env.run(&["type", "list", "-o", "json"])).unwrap();
  assert_eq!(listed[0]["name"], json!("thor/translations"));

  let text = env.run(&["type", "list"]);
  assert!(text.contains("thor/translations"));
  assert!(text.contains("default 10"));

  env.run(&["type", "define", "thor/css"]);
  let text = env.run(&["type", "list"]);
  assert!(text.contains("parameters: none"));
}

#[test]
fn test_duplicate_type_fails() {
  let env = TestEnv::empty();
  env.run(&["type", "define", "thor/css"]);

  env
    .bindisc_cmd()
    .args(["type", "define", "thor/css"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("already defined"));
}

#[test]
fn test_invalid_type_name_fails() {
  let env = TestEnv::empty();
  env
    .bindisc_cmd()
    .args(["type", "define", "1bad"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("must start with a letter"));
}

#[test]
fn test_undefine_cascades_to_bindings() {
  let env = TestEnv::with_files(&["app/a.css"]);
  env.run(&["type", "define", "thor/css"]);
  env.run(&["type", "define", "thor/js"]);
  env.run(&["bind", "/app/*.css", "thor/css"]);
  env.run(&["bind", "/app/*.js", "thor/js"]);
  env.run(&["bind", "/lib/**", "thor/css"]);

  let stdout = env.run(&["type", "undefine", "thor/css"]);
  assert!(stdout.contains("Bindings removed: 2"));

  let remaining = env.find_json(&[]);
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0]["type_name"], json!("thor/js"));

  let store = env.store_json();
  assert!(store.get("thor/css").is_none());
  assert_eq!(store["//typeIndex"], json!({"thor/js": [2]}));
  assert_eq!(store["//queryIndex"], json!({"/app/*.js": [2]}));
}

#[test]
fn test_undefine_unknown_type_fails() {
  let env = TestEnv::empty();
  env
    .bindisc_cmd()
    .args(["type", "undefine", "nothing"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("is not defined"));
}
