use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn next_express(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_next-express"))
        .args(args)
        .env("HOME", home)
        .env("APPDATA", home)
        .output()
        .unwrap()
}

fn envelope(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn plan_prints_steps_without_running_them() {
    let home = TempDir::new().unwrap();
    let parent = TempDir::new().unwrap();
    let parent_arg = parent.path().to_string_lossy().to_string();

    let output = next_express(
        home.path(),
        &["plan", "demo", "--parent", &parent_arg, "--with", "redux", "--step", "git-init", "--skip", "build"],
    );
    let json = envelope(&output);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json["success"], true);
    let ids: Vec<&str> = json["data"]["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec!["scaffold", "install-redux", "git-init", "open-editor", "dev-server", "open-browser"]
    );
    assert!(!parent.path().join("demo").exists());
}

#[test]
fn create_into_non_empty_directory_exits_3() {
    let home = TempDir::new().unwrap();
    let parent = TempDir::new().unwrap();
    fs::create_dir(parent.path().join("demo")).unwrap();
    fs::write(parent.path().join("demo").join("index.js"), "").unwrap();
    let parent_arg = parent.path().to_string_lossy().to_string();

    let output = next_express(home.path(), &["create", "demo", "--parent", &parent_arg]);
    let json = envelope(&output);

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "path.conflict");
}

#[test]
fn create_without_name_exits_2() {
    let home = TempDir::new().unwrap();
    let output = next_express(home.path(), &["create"]);
    let json = envelope(&output);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(json["error"]["code"], "validation.missing_argument");
}

#[test]
fn config_set_changes_planned_package_manager() {
    let home = TempDir::new().unwrap();
    let parent = TempDir::new().unwrap();
    let parent_arg = parent.path().to_string_lossy().to_string();

    let set = next_express(home.path(), &["config", "set", "/defaults/packageManager", "\"yarn\""]);
    assert_eq!(set.status.code(), Some(0));

    let path = envelope(&next_express(home.path(), &["config", "path"]));
    assert_eq!(path["data"]["exists"], true);

    let plan = envelope(&next_express(home.path(), &["plan", "demo", "--parent", &parent_arg]));
    assert_eq!(plan["data"]["config"]["packageManager"], "yarn");
    let scaffold_args = plan["data"]["steps"][0]["command"]["args"].as_array().unwrap().clone();
    assert!(scaffold_args.contains(&Value::from("--use-yarn")));

    let reset = envelope(&next_express(home.path(), &["config", "reset"]));
    assert_eq!(reset["data"]["deleted"], true);
}

#[test]
fn config_set_rejects_invalid_value() {
    let home = TempDir::new().unwrap();
    let output = next_express(home.path(), &["config", "set", "/defaults/packageManager", "\"bun\""]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(envelope(&output)["error"]["code"], "validation.invalid_json");
}
