//! Help output and argument parsing of the dem binary.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::Sandbox;

fn dem() -> Command {
    Sandbox::new().dem()
}

#[test]
fn no_args_shows_help_and_exits_two() {
    dem()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Manage containerized Development Environments"));
}

#[test]
fn help_lists_the_main_commands() {
    let assert = dem().arg("--help").assert().success();
    let out = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for command in [
        "list", "info", "install", "uninstall", "pull", "clone", "create", "modify", "delete",
        "rename", "cp", "export", "load", "set-default", "run", "list-tools", "registry",
        "catalog", "config",
    ] {
        assert!(out.contains(command), "missing {command} in help:\n{out}");
    }
}

#[test]
fn version_flag_names_the_binary() {
    dem()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("dem "));
}

#[test]
fn unknown_tool_type_is_rejected() {
    dem()
        .args(["create", "demo", "--tool", "compiler=gcc:13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown tool type 'compiler'"));
}

#[test]
fn create_requires_a_tool() {
    dem().args(["create", "demo"]).assert().code(2);
}

#[test]
fn errors_are_json_objects_with_json_flag() {
    let assert = dem()
        .args(["--json", "delete", "ghost"])
        .assert()
        .failure();
    let out: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap_or_default();
    assert_eq!(out["error"], true);
    assert_eq!(out["code"], "dev_env_error");
}

#[test]
fn corrupt_document_is_reported_not_repaired() {
    let sandbox = Sandbox::new();
    let doc = sandbox.home.path().join("dev_env.json");
    std::fs::write(&doc, "{ broken").unwrap_or_else(|e| panic!("{e}"));

    sandbox
        .dem()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt"));
    let after = std::fs::read_to_string(&doc).unwrap_or_default();
    assert_eq!(after, "{ broken");
}
