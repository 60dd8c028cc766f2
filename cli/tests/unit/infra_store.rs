//! Tests for the JSON collection store and descriptor files.

#![allow(clippy::expect_used)]

use tempfile::TempDir;

use dem_cli::application::ports::CollectionStore;
use dem_cli::domain::{DataStorageError, InvalidDocumentVersion};
use dem_cli::infra::store::{JsonCollectionStore, read_definitions, write_definition};
use dem_common::{RegistryDescriptor, ToolType};

use crate::mocks::{collection, dev_env, installed};

fn store_in(dir: &TempDir) -> JsonCollectionStore {
    JsonCollectionStore::with_path(dir.path().join("dem").join("dev_env.json"))
}

#[tokio::test]
async fn missing_document_is_an_empty_collection() {
    let dir = TempDir::new().expect("temp dir");
    let loaded = store_in(&dir).load().await.expect("load");
    assert!(loaded.dev_envs().is_empty());
    assert!(loaded.registries().is_empty());
}

#[tokio::test]
async fn saved_collection_loads_back_identically() {
    let dir = TempDir::new().expect("temp dir");
    let store = store_in(&dir);
    let mut c = collection(vec![
        installed(dev_env("demo", &[(ToolType::BuildSystem, "make:latest")])),
        dev_env("other", &[(ToolType::Toolchain, "gcc:13")]),
    ]);
    c.set_default(Some("other")).expect("default");
    c.add_registry(RegistryDescriptor {
        name: "axem".to_string(),
        url: "axemsolutions".to_string(),
        kind: None,
    })
    .expect("registry");

    store.save(&c).await.expect("save");
    let loaded = store.load().await.expect("load");

    assert_eq!(loaded, c);
    assert!(!store.path().with_extension("json.tmp").exists());
}

#[tokio::test]
async fn corrupt_document_is_a_storage_error() {
    let dir = TempDir::new().expect("temp dir");
    let store = store_in(&dir);
    std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
    std::fs::write(store.path(), "{ not json").expect("write");

    let err = store.load().await.expect_err("corrupt");
    assert!(matches!(
        err.downcast_ref::<DataStorageError>(),
        Some(DataStorageError::Corrupt { .. })
    ));
}

#[tokio::test]
async fn two_defaults_are_rejected_not_repaired() {
    let dir = TempDir::new().expect("temp dir");
    let store = store_in(&dir);
    std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
    std::fs::write(
        store.path(),
        r#"{"version":"0.1","development_environments":[
            {"name":"a","installed":"False","default":"True","tools":[]},
            {"name":"b","installed":"False","default":"True","tools":[]}
        ]}"#,
    )
    .expect("write");

    let err = store.load().await.expect_err("two defaults");
    assert!(err.downcast_ref::<DataStorageError>().is_some(), "{err:#}");
}

#[tokio::test]
async fn future_major_version_is_refused() {
    let dir = TempDir::new().expect("temp dir");
    let store = store_in(&dir);
    std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
    std::fs::write(store.path(), r#"{"version":"1.0","development_environments":[]}"#)
        .expect("write");

    let err = store.load().await.expect_err("unsupported");
    let version = err
        .downcast_ref::<InvalidDocumentVersion>()
        .expect("version error");
    assert_eq!(version.found, "1.0");
}

#[test]
fn exported_definition_reads_back_without_flags() {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("demo.json");
    let mut env = installed(dev_env("demo", &[(ToolType::Debugger, "stlink:latest")]));
    env.default = true;

    write_definition(&file, env.to_descriptor()).expect("export");
    let read = read_definitions(&file).expect("read");

    assert_eq!(read.len(), 1);
    assert_eq!(read[0].name, "demo");
    assert!(!read[0].installed);
    assert!(!read[0].default);
    assert_eq!(read[0].tools, env.to_descriptor().tools);
}

#[test]
fn bare_descriptor_file_is_accepted() {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("bare.json");
    std::fs::write(
        &file,
        r#"{"name":"bare","tools":[{"type":"toolchain","image_name":"gcc","image_version":"13"}]}"#,
    )
    .expect("write");

    let read = read_definitions(&file).expect("read");
    assert_eq!(read[0].name, "bare");
    assert_eq!(read[0].tools.len(), 1);
}
