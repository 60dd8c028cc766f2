//! Infrastructure implementation of the `CollectionStore` port.
//!
//! `JsonCollectionStore` reads and writes `dev_env.json` on a blocking
//! thread. Writes go to a temp file that is renamed over the document, so a
//! crash leaves either the old or the new snapshot.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dem_common::{
    CURRENT_VERSION, CatalogDocument, DevEnvDescriptor, DevEnvDocument, DocumentVersion,
    SUPPORTED_MAJOR,
};

use crate::application::ports::CollectionStore;
use crate::domain::{DataStorageError, DevEnvCollection, InvalidDocumentVersion};
use crate::infra::config::dem_home;

/// File name of the persisted collection under `$DEM_HOME`.
pub const DOCUMENT_FILE: &str = "dev_env.json";

/// Collection store backed by one JSON document.
pub struct JsonCollectionStore {
    path: PathBuf,
}

impl JsonCollectionStore {
    /// Store at `$DEM_HOME/dev_env.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(dem_home()?.join(DOCUMENT_FILE)))
    }

    /// Store at an explicit path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load_sync(path: &Path) -> Result<DevEnvCollection> {
    let origin = path.display().to_string();
    if !path.exists() {
        return Ok(DevEnvCollection::default());
    }
    let content = std::fs::read_to_string(path).map_err(|e| DataStorageError::Unreadable {
        path: origin.clone(),
        reason: e.to_string(),
    })?;
    let doc: DevEnvDocument =
        serde_json::from_str(&content).map_err(|e| DataStorageError::Corrupt {
            path: origin.clone(),
            reason: e.to_string(),
        })?;
    DevEnvCollection::from_document(&doc, &origin)
}

fn save_sync(path: &Path, doc: &DevEnvDocument) -> Result<()> {
    let failed = |reason: String| DataStorageError::WriteFailed {
        path: path.display().to_string(),
        reason,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;
    }
    let mut content = serde_json::to_string_pretty(doc).map_err(|e| failed(e.to_string()))?;
    content.push('\n');

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, &content).map_err(|e| failed(e.to_string()))?;
    std::fs::rename(&temp_path, path).map_err(|e| failed(e.to_string()))?;
    Ok(())
}

/// Write one DevEnv definition as a single-entry catalog document, so an
/// exported file can also be served as a catalog.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_definition(path: &Path, definition: DevEnvDescriptor) -> Result<()> {
    let doc = CatalogDocument {
        version: CURRENT_VERSION.to_string(),
        development_environments: vec![DevEnvDescriptor {
            installed: false,
            default: false,
            ..definition
        }],
    };
    let content = serde_json::to_string_pretty(&doc).context("serializing definition")?;
    std::fs::write(path, content + "\n").with_context(|| format!("cannot write {}", path.display()))
}

/// Read DevEnv definitions from a catalog-shaped document or a bare
/// descriptor.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or carries an
/// unsupported version.
pub fn read_definitions(path: &Path) -> Result<Vec<DevEnvDescriptor>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    if let Ok(doc) = serde_json::from_str::<CatalogDocument>(&content) {
        let version: DocumentVersion = doc
            .version
            .parse()
            .with_context(|| format!("invalid version in {}", path.display()))?;
        if !version.is_supported() {
            return Err(InvalidDocumentVersion {
                found: doc.version,
                supported: SUPPORTED_MAJOR,
            }
            .into());
        }
        return Ok(doc.development_environments);
    }
    let descriptor: DevEnvDescriptor = serde_json::from_str(&content)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    Ok(vec![descriptor])
}

impl CollectionStore for JsonCollectionStore {
    async fn load(&self) -> Result<DevEnvCollection> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load_sync(&path))
            .await
            .context("collection load task panicked")?
    }

    async fn save(&self, collection: &DevEnvCollection) -> Result<()> {
        let path = self.path.clone();
        let doc = collection.to_document();
        tokio::task::spawn_blocking(move || save_sync(&path, &doc))
            .await
            .context("collection save task panicked")?
    }
}
