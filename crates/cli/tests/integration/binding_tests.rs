use predicates::prelude::*;
use serde_json::json;

use super::common::TestEnv;

fn env_with_types() -> TestEnv {
  let env = TestEnv::with_files(&["app/a.css", "app/b.css", "app/sub/c.css", "app/en.po", "app/de.po"]);
  env.run(&["type", "define", "thor/css"]);
  env.run(&[
    "type",
    "define",
    "thor/translations",
    "--required",
    "lang",
    "--param",
    "priority=10",
  ]);
  env
}

#[test]
fn test_bind_assigns_sequential_ids() {
  let env = env_with_types();

  let first = env.run(&["bind", "/app/*.css", "thor/css"]);
  assert!(first.contains("Id: 1"));
  let second = env.run(&["bind", "/app/*.po", "thor/translations", "--set", "lang=en"]);
  assert!(second.contains("Id: 2"));

  let store = env.store_json();
  assert_eq!(store["//nextId"], json!(3));
  assert_eq!(
    store["2"],
    json!({
      "query": "/app/*.po",
      "type_name": "thor/translations",
      "parameter_values": {"lang": "en"},
      "language": "glob"
    })
  );
}

#[test]
fn test_bind_unknown_type_fails() {
  let env = env_with_types();
  env
    .bindisc_cmd()
    .args(["bind", "/app/*.css", "thor/js"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("is not defined"));
}

#[test]
fn test_bind_missing_required_parameter_fails() {
  let env = env_with_types();
  env
    .bindisc_cmd()
    .args(["bind", "/app/*.po", "thor/translations"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("requires parameter lang"));

  env
    .bindisc_cmd()
    .args(["bind", "/app/*.po", "thor/translations", "--set", "lang=en", "--set", "color=red"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("has no parameter color"));
}

#[test]
fn test_find_reports_effective_parameters() {
  let env = env_with_types();
  env.run(&["bind", "/app/*.po", "thor/translations", "--set", "lang=en"]);
  env.run(&["bind", "/app/*.po", "thor/translations", "--set", "lang=de", "--set", "priority=1"]);
  env.run(&["bind", "/app/*.css", "thor/css"]);

  let found = env.find_json(&["--type", "thor/translations"]);
  assert_eq!(found.len(), 2);
  assert_eq!(found[0]["id"], json!(1));
  assert_eq!(found[0]["parameters"], json!({"lang": "en", "priority": 10}));
  assert!(found[0].get("resources").is_none());

  let defaulted = env.find_json(&["--type", "thor/translations", "--set", "priority=10"]);
  assert_eq!(defaulted.len(), 1);
  assert_eq!(defaulted[0]["id"], json!(1));

  let by_query = env.find_json(&["--query", "/app/*.po"]);
  assert_eq!(by_query.len(), 2);

  assert_eq!(env.find_json(&["--query", "/app/*.po", "--type", "thor/css"]).len(), 0);
}

#[test]
fn test_find_resolve_lists_resources() {
  let env = env_with_types();
  env.run(&["bind", "/app/*.css", "thor/css"]);

  let found = env.find_json(&["--resolve"]);
  assert_eq!(found[0]["resources"], json!([{"path": "/app/a.css"}, {"path": "/app/b.css"}]));

  env.write_file("app/z.css", "");
  let later = env.find_json(&["--resolve"]);
  assert_eq!(later[0]["resources"].as_array().unwrap().len(), 3);

  let text = env.run(&["find", "--resolve"]);
  assert!(text.contains("/app/a.css"));
}

#[test]
fn test_find_resolve_with_unsupported_language_fails() {
  let env = env_with_types();
  env.run(&["bind", "/app/*.css", "thor/css", "--language", "xpath"]);

  let found = env.find_json(&[]);
  assert_eq!(found[0]["language"], json!("xpath"));

  env
    .bindisc_cmd()
    .args(["find", "--resolve"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unsupported query language: xpath"));
}

#[test]
fn test_unbind_by_id() {
  let env = env_with_types();
  env.run(&["bind", "/app/*.css", "thor/css"]);
  env.run(&["bind", "/app/*.css", "thor/css"]);

  let stdout = env.run(&["unbind", "--id", "1"]);
  assert!(stdout.contains("Removed binding 1"));

  let remaining = env.find_json(&[]);
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0]["id"], json!(2));

  env
    .bindisc_cmd()
    .args(["unbind", "--id", "1"])
    .assert()
    .success()
    .stderr(predicate::str::contains("No binding with id 1"));

  let after = env.run(&["bind", "/app/*.css", "thor/css"]);
  assert!(after.contains("Id: 3"));
}

#[test]
fn test_unbind_by_query_and_type_removes_only_pair() {
  let env = env_with_types();
  env.run(&["bind", "q1", "thor/css"]);
  env.run(&["bind", "q1", "thor/translations", "--set", "lang=en"]);
  env.run(&["bind", "q2", "thor/css"]);

  let stdout = env.run(&["unbind", "--query", "q1", "--type", "thor/css"]);
  assert!(stdout.contains("Bindings removed: 1"));

  let ids: Vec<_> = env.find_json(&[]).iter().map(|b| b["id"].clone()).collect();
  assert_eq!(ids, vec![json!(2), json!(3)]);

  let store = env.store_json();
  assert_eq!(store["//queryIndex"], json!({"q1": [2], "q2": [3]}));
  assert_eq!(store["//typeIndex"], json!({"thor/css": [3], "thor/translations": [2]}));
}

#[test]
fn test_unbind_by_parameter_value() {
  let env = env_with_types();
  env.run(&["bind", "/app/*.po", "thor/translations", "--set", "lang=en"]);
  env.run(&["bind", "/app/*.po", "thor/translations", "--set", "lang=de"]);

  env.run(&["unbind", "--type", "thor/translations", "--set", "lang=de"]);

  let remaining = env.find_json(&[]);
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0]["parameters"]["lang"], json!("en"));
}

#[test]
fn test_unbind_without_criteria_fails() {
  let env = env_with_types();
  env.run(&["bind", "/app/*.css", "thor/css"]);

  env
    .bindisc_cmd()
    .arg("unbind")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Refusing to remove every binding"));
  assert_eq!(env.find_json(&[]).len(), 1);
}

#[test]
fn test_clear_force_wipes_store() {
  let env = env_with_types();
  env.run(&["bind", "/app/*.css", "thor/css"]);
  env.run(&["bind", "/app/*.css", "thor/css"]);

  let stdout = env.run(&["clear", "--force"]);
  assert!(stdout.contains("Cleared 2 binding(s) and 2 type(s)"));
  assert_eq!(env.store_json(), json!({}));

  assert!(env.run(&["type", "list"]).contains("No types defined"));

  env.run(&["type", "define", "thor/css"]);
  let rebound = env.run(&["bind", "/app/*.css", "thor/css"]);
  assert!(rebound.contains("Id: 1"));
}

#[test]
fn test_bind_with_exhausted_counter_fails() {
  let env = env_with_types();
  let mut store = env.store_json();
  store["//nextId"] = json!(u64::MAX);
  std::fs::write(env.store_path(), serde_json::to_string(&store).unwrap()).unwrap();

  env
    .bindisc_cmd()
    .args(["bind", "/app/*.css", "thor/css"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("binding id counter exhausted"));
  assert!(env.find_json(&[]).is_empty());
}
