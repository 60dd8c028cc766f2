//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `dem_common`, never from
//! `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;
use dem_common::{CatalogDescriptor, CatalogDocument};

use crate::domain::{
    CatalogError, ContainerEngineError, DemConfig, DevEnvCollection, ImageSet, RegistryError,
    ToolImage,
};

// ── Container Engine Port ─────────────────────────────────────────────────────

/// Local container engine: image listing, pull, remove, run.
#[allow(async_fn_in_trait)]
pub trait ContainerEngine {
    /// Every `name:tag` reference present on the local machine.
    async fn list_local_images(&self) -> Result<ImageSet, ContainerEngineError>;
    /// Pull one image from its registry.
    async fn pull(&self, image: &ToolImage) -> Result<(), ContainerEngineError>;
    /// Remove one image from the local machine.
    async fn remove(&self, image: &ToolImage) -> Result<(), ContainerEngineError>;
    /// Run `command` inside `image` with `workdir` mounted, returning the exit code.
    async fn run(
        &self,
        image: &ToolImage,
        workdir: &Path,
        command: &[String],
    ) -> Result<i32, ContainerEngineError>;
}

// ── Registry Port ─────────────────────────────────────────────────────────────

/// One remote image registry. Implementations differ only in endpoint shapes.
#[allow(async_fn_in_trait)]
pub trait RegistryClient {
    /// Configured registry name, used in skip notices.
    fn name(&self) -> &str;
    /// Repository names as the tags endpoint expects them.
    async fn list_repositories(&self) -> Result<Vec<String>, RegistryError>;
    /// Every tag of one repository.
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, RegistryError>;
    /// Image name a pulled `repository` carries locally.
    fn image_name(&self, repository: &str) -> String;
}

// ── Catalog Port ──────────────────────────────────────────────────────────────

/// Fetches a remote catalog document.
#[allow(async_fn_in_trait)]
pub trait CatalogFetcher {
    /// Download and decode the catalog document.
    async fn fetch(&self, catalog: &CatalogDescriptor) -> Result<CatalogDocument, CatalogError>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<std::process::ExitStatus>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message, e.g. a skipped registry or catalog.
    fn warn(&self, message: &str);
}

// ── State and Config Ports ────────────────────────────────────────────────────

/// Persistence of the full local DevEnv collection snapshot.
#[allow(async_fn_in_trait)]
pub trait CollectionStore {
    /// Load the collection; a missing document is an empty collection.
    ///
    /// # Errors
    ///
    /// `DataStorageError` for an unreadable or corrupt document,
    /// `InvalidDocumentVersion` for an unsupported major version.
    async fn load(&self) -> Result<DevEnvCollection>;
    /// Atomically replace the persisted snapshot.
    async fn save(&self, collection: &DevEnvCollection) -> Result<()>;
}

/// Persistence of the user configuration.
pub trait ConfigStore {
    /// Load configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<DemConfig>;
    /// Persist configuration.
    fn save(&self, config: &DemConfig) -> Result<()>;
    /// Path of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
