//! Local DevEnv management through the binary: create, list, copy, rename,
//! default, delete, export and load.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::Sandbox;

fn with_demo() -> Sandbox {
    let sandbox = Sandbox::new();
    sandbox
        .dem()
        .args([
            "create",
            "demo",
            "--tool",
            "build-system=axemsolutions/make_gnu_arm:latest",
            "--tool",
            "test-framework=axemsolutions/cpputest:latest",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created Development Environment 'demo'"));
    sandbox
}

#[test]
fn list_without_dev_envs_suggests_next_steps() {
    Sandbox::new()
        .dem()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No Development Environments"));
}

#[test]
fn created_dev_env_is_persisted_uninstalled() {
    let sandbox = with_demo();
    let doc = sandbox.document();

    assert_eq!(doc["version"], "0.1");
    let env = &doc["development_environments"][0];
    assert_eq!(env["name"], "demo");
    assert_eq!(env["installed"], false);
    assert_eq!(env["tools"][0]["type"], "build system");
    assert_eq!(env["tools"][1]["image_name"], "axemsolutions/cpputest");
}

#[test]
fn list_shows_state_and_tool_count() {
    let sandbox = with_demo();
    sandbox
        .dem()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("not installed"))
        .stdout(predicate::str::contains("2 tools"));
}

#[test]
fn list_json_carries_state() {
    let sandbox = with_demo();
    let assert = sandbox.dem().args(["--json", "list"]).assert().success();
    let out: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json");
    assert_eq!(out["development_environments"][0]["state"], "uninstalled");
}

#[test]
fn duplicate_create_fails() {
    let sandbox = with_demo();
    sandbox
        .dem()
        .args(["create", "demo", "--tool", "toolchain=gcc:13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn copy_rename_and_delete() {
    let sandbox = with_demo();
    sandbox.dem().args(["cp", "demo", "copy"]).assert().success();
    sandbox
        .dem()
        .args(["rename", "copy", "renamed"])
        .assert()
        .success();

    let names: Vec<String> = sandbox.document()["development_environments"]
        .as_array()
        .expect("array")
        .iter()
        .map(|e| e["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["demo", "renamed"]);

    sandbox.dem().args(["delete", "renamed"]).assert().success();
    assert_eq!(
        sandbox.document()["development_environments"]
            .as_array()
            .expect("array")
            .len(),
        1
    );
}

#[test]
fn set_default_and_clear() {
    let sandbox = with_demo();
    sandbox
        .dem()
        .args(["set-default", "demo"])
        .assert()
        .success();
    assert_eq!(sandbox.document()["development_environments"][0]["default"], true);
    sandbox
        .dem()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default]"));

    sandbox
        .dem()
        .args(["set-default", "--clear"])
        .assert()
        .success();
    assert_eq!(sandbox.document()["development_environments"][0]["default"], false);
}

#[test]
fn set_default_on_unknown_name_fails() {
    Sandbox::new()
        .dem()
        .args(["set-default", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'ghost' not found"));
}

#[test]
fn modify_replaces_and_removes_tools() {
    let sandbox = with_demo();
    sandbox
        .dem()
        .args([
            "modify",
            "demo",
            "--tool",
            "build-system=axemsolutions/make_gnu_arm:4.3",
            "--remove-tool",
            "test-framework",
        ])
        .assert()
        .success();

    let tools = sandbox.document()["development_environments"][0]["tools"].clone();
    assert_eq!(tools.as_array().expect("array").len(), 1);
    assert_eq!(tools[0]["image_version"], "4.3");
}

#[test]
fn modify_without_changes_is_an_error() {
    let sandbox = with_demo();
    sandbox
        .dem()
        .args(["modify", "demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn installed_dev_env_cannot_be_renamed() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.home.path().join("dev_env.json"),
        r#"{"version":"0.1","development_environments":[
            {"name":"demo","installed":"True","default":"False","tools":[]}
        ]}"#,
    )
    .expect("write");

    sandbox
        .dem()
        .args(["rename", "demo", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dem uninstall demo"));
}

#[test]
fn export_then_load_under_another_home() {
    let source = with_demo();
    let file = source.home.path().join("demo-export.json");
    source
        .dem()
        .args(["export", "demo"])
        .arg(&file)
        .assert()
        .success();

    let target = Sandbox::new();
    target.dem().arg("load").arg(&file).assert().success();

    let env = &target.document()["development_environments"][0];
    assert_eq!(env["name"], "demo");
    assert_eq!(env["installed"], false);
    assert_eq!(env["tools"].as_array().expect("array").len(), 2);

    // Loading again clashes with the local copy.
    target
        .dem()
        .arg("load")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn load_with_a_clash_adds_nothing() {
    let sandbox = with_demo();
    let file = sandbox.home.path().join("bundle.json");
    std::fs::write(
        &file,
        r#"{"version":"0.1","development_environments":[
            {"name":"fresh","tools":[{"type":"toolchain","image_name":"gcc","image_version":"13"}]},
            {"name":"demo","tools":[]}
        ]}"#,
    )
    .expect("write");
    let before = sandbox.document();

    sandbox
        .dem()
        .arg("load")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("'demo' already exists"));

    assert_eq!(sandbox.document(), before);
}

#[test]
fn unsupported_document_version_is_refused() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.home.path().join("dev_env.json"),
        r#"{"version":"2.0","development_environments":[]}"#,
    )
    .expect("write");

    sandbox
        .dem()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"));
}
