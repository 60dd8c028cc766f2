//! `dem registry` add, list and del.

#![allow(clippy::expect_used)]

use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::Sandbox;

#[test]
fn add_infers_the_kind_from_the_url() {
    let sandbox = Sandbox::new();
    sandbox
        .dem()
        .args(["registry", "add", "axem", "axemsolutions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added registry 'axem'"));
    sandbox
        .dem()
        .args(["registry", "add", "local", "http://localhost:5000", "--kind", "v2"])
        .assert()
        .success();

    let registries = sandbox.document()["registries"].clone();
    assert_eq!(registries[0]["name"], "axem");
    assert!(registries[0].get("kind").is_none());
    assert_eq!(registries[1]["kind"], "v2");
}

#[test]
fn duplicate_registry_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .dem()
        .args(["registry", "add", "axem", "axemsolutions"])
        .assert()
        .success();
    sandbox
        .dem()
        .args(["registry", "add", "axem", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn del_removes_and_rm_is_an_alias() {
    let sandbox = Sandbox::new();
    sandbox
        .dem()
        .args(["registry", "add", "a", "org-a"])
        .assert()
        .success();
    sandbox
        .dem()
        .args(["registry", "add", "b", "org-b"])
        .assert()
        .success();

    sandbox.dem().args(["registry", "del", "a"]).assert().success();
    sandbox.dem().args(["registry", "rm", "b"]).assert().success();
    assert_eq!(
        sandbox.document()["registries"]
            .as_array()
            .expect("array")
            .len(),
        0
    );

    sandbox
        .dem()
        .args(["registry", "del", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn list_without_registries_suggests_adding_one() {
    Sandbox::new()
        .dem()
        .args(["registry", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dem registry add"));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_counts_images_and_skips_unreachable_registries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/_catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "repositories": ["gcc"] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/gcc/tags/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": "gcc", "tags": ["12", "13"] })),
        )
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    sandbox
        .dem()
        .args(["registry", "add", "mock"])
        .arg(server.uri())
        .assert()
        .success();
    sandbox
        .dem()
        .args(["registry", "add", "dead", "http://127.0.0.1:9"])
        .assert()
        .success();

    let assert = sandbox
        .dem()
        .args(["--json", "registry", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping registry"));
    let out: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json");
    assert_eq!(out["registries"][0]["images"], 2);
    assert_eq!(out["registries"][1]["images"], serde_json::Value::Null);
}
