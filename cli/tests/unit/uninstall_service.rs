//! Tests for uninstall with refcounted image cleanup.

#![allow(clippy::expect_used)]

use dem_cli::application::services::Platform;
use dem_cli::domain::{DevEnvError, ToolImage};
use dem_common::ToolType;

use crate::mocks::{FakeEngine, MemoryStore, RecordingReporter, collection, dev_env, installed};

#[tokio::test]
async fn shared_images_are_kept_and_orphans_removed() {
    let a = installed(dev_env(
        "a",
        &[
            (ToolType::BuildSystem, "make:latest"),
            (ToolType::Toolchain, "gcc:13"),
        ],
    ));
    let b = installed(dev_env("b", &[(ToolType::BuildSystem, "make:latest")]));
    let store = MemoryStore::with(collection(vec![a, b]));
    let mut platform = Platform::load(store.clone()).await.expect("load");
    let engine = FakeEngine::with_local(&["make:latest", "gcc:13"]);
    let reporter = RecordingReporter::default();

    let report = platform
        .uninstall("a", &engine, &reporter)
        .await
        .expect("uninstall");

    assert_eq!(engine.removed(), vec!["gcc:13"]);
    assert!(engine.has("make:latest"));
    assert_eq!(report.kept, vec![ToolImage::new("make", "latest")]);
    assert!(
        reporter
            .steps()
            .iter()
            .any(|s| s.contains("make:latest") && s.contains("another Development Environment"))
    );
    assert!(!store.saved().get("a").expect("a").installed);
    assert!(store.saved().get("b").expect("b").installed);
}

#[tokio::test]
async fn uninstalled_dev_envs_still_hold_their_images() {
    let a = installed(dev_env("a", &[(ToolType::Toolchain, "gcc:13")]));
    let b = dev_env("b", &[(ToolType::Toolchain, "gcc:13")]);
    let mut platform = Platform::load(MemoryStore::with(collection(vec![a, b])))
        .await
        .expect("load");
    let engine = FakeEngine::with_local(&["gcc:13"]);

    platform
        .uninstall("a", &engine, &RecordingReporter::default())
        .await
        .expect("uninstall");

    assert!(engine.removed().is_empty());
}

#[tokio::test]
async fn already_absent_images_are_not_an_error() {
    let a = installed(dev_env("a", &[(ToolType::Toolchain, "gcc:13")]));
    let mut platform = Platform::load(MemoryStore::with(collection(vec![a])))
        .await
        .expect("load");
    let engine = FakeEngine::default();

    let report = platform
        .uninstall("a", &engine, &RecordingReporter::default())
        .await
        .expect("uninstall");

    assert_eq!(report.absent, vec![ToolImage::new("gcc", "13")]);
    assert!(engine.removed().is_empty());
    assert!(!platform.get_by_name("a").expect("a").installed);
}

#[tokio::test]
async fn removal_failure_keeps_the_installed_flag() {
    let a = installed(dev_env(
        "a",
        &[
            (ToolType::BuildSystem, "make:latest"),
            (ToolType::Toolchain, "gcc:13"),
        ],
    ));
    let store = MemoryStore::with(collection(vec![a]));
    let mut platform = Platform::load(store.clone()).await.expect("load");
    let engine = FakeEngine {
        fail_remove: Some("make:latest".to_string()),
        ..FakeEngine::with_local(&["make:latest", "gcc:13"])
    };

    let err = platform
        .uninstall("a", &engine, &RecordingReporter::default())
        .await
        .expect_err("removal fails");

    let msg = format!("{err:#}");
    assert!(msg.contains("gcc:13"), "{msg}");
    assert!(msg.contains("image is in use"), "{msg}");
    assert!(platform.get_by_name("a").expect("a").installed);
    assert_eq!(store.saves(), 0);
}

#[tokio::test]
async fn not_installed_is_rejected_before_touching_the_engine() {
    let mut platform = Platform::load(MemoryStore::with(collection(vec![dev_env("a", &[])])))
        .await
        .expect("load");
    let engine = FakeEngine::default();

    let err = platform
        .uninstall("a", &engine, &RecordingReporter::default())
        .await
        .expect_err("not installed");

    assert!(matches!(
        err.downcast_ref::<DevEnvError>(),
        Some(DevEnvError::NotInstalled(_))
    ));
    assert_eq!(engine.list_calls(), 0);
}
