//! Tests for install: pull phase, completeness check, persistence.

#![allow(clippy::expect_used)]

use dem_cli::application::services::{AvailabilityIndex, Platform};
use dem_cli::domain::{AvailabilityStatus, DevEnvError};
use dem_common::ToolType;

use crate::mocks::{
    FakeEngine, FakeRegistry, MemoryStore, RecordingReporter, collection, dev_env,
};

fn demo() -> dem_cli::domain::DevEnv {
    dev_env(
        "demo",
        &[
            (ToolType::BuildSystem, "make:latest"),
            (ToolType::Debugger, "stlink:latest"),
            (ToolType::TestFramework, "cpputest:latest"),
        ],
    )
}

#[tokio::test]
async fn pulls_registry_only_images_and_marks_installed() {
    let store = MemoryStore::with(collection(vec![demo()]));
    let mut platform = Platform::load(store.clone()).await.expect("load");
    let engine = FakeEngine::with_local(&["stlink:latest"]);
    let registries = vec![FakeRegistry::new(
        "axem",
        &[("make", &["latest"]), ("cpputest", &["latest"])],
    )];
    let mut index = AvailabilityIndex::new(&engine, &registries);
    let reporter = RecordingReporter::default();

    let report = platform
        .install("demo", &mut index, &reporter)
        .await
        .expect("install");

    assert_eq!(engine.pulled(), vec!["cpputest:latest", "make:latest"]);
    assert_eq!(report.pulled.len(), 2);
    assert!(report.classification.is_complete());
    assert!(platform.get_by_name("demo").expect("exists").installed);
    assert!(store.saved().get("demo").expect("saved").installed);
    assert_eq!(store.saves(), 1);
}

#[tokio::test]
async fn local_only_images_are_never_pulled() {
    let store = MemoryStore::with(collection(vec![demo()]));
    let mut platform = Platform::load(store).await.expect("load");
    let engine = FakeEngine::with_local(&["make:latest", "stlink:latest", "cpputest:latest"]);
    let registries: Vec<FakeRegistry> = Vec::new();
    let mut index = AvailabilityIndex::new(&engine, &registries);

    let report = platform
        .install("demo", &mut index, &RecordingReporter::default())
        .await
        .expect("install");

    assert!(engine.pulled().is_empty());
    assert!(
        report
            .classification
            .statuses()
            .iter()
            .all(|s| *s == AvailabilityStatus::LocalOnly)
    );
}

#[tokio::test]
async fn unavailable_tool_leaves_the_dev_env_uninstalled() {
    let store = MemoryStore::with(collection(vec![demo()]));
    let mut platform = Platform::load(store.clone()).await.expect("load");
    let engine = FakeEngine::default();
    let registries = vec![FakeRegistry::new("axem", &[("make", &["latest"])])];
    let mut index = AvailabilityIndex::new(&engine, &registries);

    let err = platform
        .install("demo", &mut index, &RecordingReporter::default())
        .await
        .expect_err("stlink and cpputest are nowhere");

    match err.downcast_ref::<DevEnvError>() {
        Some(DevEnvError::InstallIncomplete { name, missing }) => {
            assert_eq!(name, "demo");
            assert!(missing.contains("stlink:latest"), "{missing}");
            assert!(missing.contains("cpputest:latest"), "{missing}");
        }
        other => panic!("expected InstallIncomplete, got {other:?}"),
    }
    // What could be pulled stays pulled.
    assert!(engine.has("make:latest"));
    assert!(!platform.get_by_name("demo").expect("exists").installed);
    assert_eq!(store.saves(), 0);
}

#[tokio::test]
async fn pull_failure_names_what_was_already_pulled() {
    let store = MemoryStore::with(collection(vec![demo()]));
    let mut platform = Platform::load(store.clone()).await.expect("load");
    let engine = FakeEngine {
        fail_pull: Some("make:latest".to_string()),
        ..FakeEngine::with_local(&["stlink:latest"])
    };
    let registries = vec![FakeRegistry::new(
        "axem",
        &[("make", &["latest"]), ("cpputest", &["latest"])],
    )];
    let mut index = AvailabilityIndex::new(&engine, &registries);

    let err = platform
        .install("demo", &mut index, &RecordingReporter::default())
        .await
        .expect_err("pull fails");

    let msg = format!("{err:#}");
    assert!(msg.contains("cpputest:latest"), "{msg}");
    assert!(msg.contains("manifest unknown"), "{msg}");
    assert!(!platform.get_by_name("demo").expect("exists").installed);
    assert_eq!(store.saves(), 0);
}

#[tokio::test]
async fn unknown_dev_env_is_not_found() {
    let mut platform = Platform::load(MemoryStore::default()).await.expect("load");
    let engine = FakeEngine::default();
    let registries: Vec<FakeRegistry> = Vec::new();
    let mut index = AvailabilityIndex::new(&engine, &registries);

    let err = platform
        .install("ghost", &mut index, &RecordingReporter::default())
        .await
        .expect_err("missing");
    assert!(matches!(
        err.downcast_ref::<DevEnvError>(),
        Some(DevEnvError::NotFound(_))
    ));
    assert_eq!(engine.list_calls(), 0);
}

#[tokio::test]
async fn health_check_flags_missing_images_without_registries() {
    let mut env = demo();
    env.installed = true;
    let store = MemoryStore::with(collection(vec![env]));
    let platform = Platform::load(store).await.expect("load");
    let engine = FakeEngine::with_local(&["make:latest", "stlink:latest"]);
    let registries = vec![FakeRegistry::new("axem", &[("cpputest", &["latest"])])];
    let mut index = AvailabilityIndex::new(&engine, &registries);

    let report = platform
        .health_check("demo", &mut index, &RecordingReporter::default())
        .await
        .expect("health");

    assert!(report.needs_repair());
    assert_eq!(report.state, dem_cli::domain::DevEnvState::Stale);
    assert_eq!(registries[0].repo_calls(), 0);
}

#[tokio::test]
async fn uninstalled_env_needs_install_even_when_images_are_local() {
    let store = MemoryStore::with(collection(vec![demo()]));
    let mut platform = Platform::load(store.clone()).await.expect("load");
    let engine = FakeEngine::with_local(&["make:latest", "stlink:latest", "cpputest:latest"]);
    let registries: Vec<FakeRegistry> = Vec::new();
    let reporter = RecordingReporter::default();

    let mut index = AvailabilityIndex::new(&engine, &registries);
    let report = platform
        .health_check("demo", &mut index, &reporter)
        .await
        .expect("health");
    assert!(report.classification.is_complete());
    assert_eq!(report.state, dem_cli::domain::DevEnvState::Uninstalled);
    assert!(report.needs_repair());

    platform
        .install("demo", &mut index, &reporter)
        .await
        .expect("install");
    assert!(engine.pulled().is_empty());
    assert!(store.saved().get("demo").expect("demo").installed);

    let report = platform
        .health_check("demo", &mut index, &reporter)
        .await
        .expect("health");
    assert_eq!(report.state, dem_cli::domain::DevEnvState::Installed);
    assert!(!report.needs_repair());
}
