//! Application service: the set of configured remote catalogs.
//!
//! Construction never touches the network. Content is fetched on request,
//! once per catalog per `CatalogSet`. When iterating several catalogs a
//! failing one is reported and skipped; an explicitly named catalog surfaces
//! its error.

use anyhow::Result;
use dem_common::{CatalogDescriptor, DocumentVersion};
use tracing::debug;

use crate::application::ports::{CatalogFetcher, ProgressReporter};
use crate::domain::{CatalogError, DevEnv};

/// One configured catalog and its lazily fetched definitions.
#[derive(Debug, Clone)]
pub struct Catalog {
    descriptor: CatalogDescriptor,
    dev_envs: Option<Vec<DevEnv>>,
}

impl Catalog {
    #[must_use]
    pub fn new(descriptor: CatalogDescriptor) -> Self {
        Self {
            descriptor,
            dev_envs: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.descriptor.url
    }

    /// Definitions fetched so far, `None` before a successful request.
    #[must_use]
    pub fn dev_envs(&self) -> Option<&[DevEnv]> {
        self.dev_envs.as_deref()
    }

    /// Fetch and decode the catalog if not done yet.
    ///
    /// Definitions always come back uninstalled and non-default.
    ///
    /// # Errors
    ///
    /// `CatalogError` when the catalog is unreachable, answers with a non-200
    /// status, or its content is corrupt.
    pub async fn request_dev_envs(
        &mut self,
        fetcher: &impl CatalogFetcher,
    ) -> Result<&[DevEnv], CatalogError> {
        if self.dev_envs.is_none() {
            let doc = fetcher.fetch(&self.descriptor).await?;
            let corrupt = |reason: String| CatalogError::Corrupt {
                name: self.descriptor.name.clone(),
                reason,
            };

            let version: DocumentVersion =
                doc.version.parse().map_err(|e| corrupt(format!("{e}")))?;
            if !version.is_supported() {
                return Err(corrupt(format!("unsupported version {version}")));
            }
            let dev_envs = doc
                .development_environments
                .iter()
                .map(|d| DevEnv::from_definition(d).map_err(|e| corrupt(e.to_string())))
                .collect::<Result<Vec<_>, _>>()?;
            debug!(catalog = %self.descriptor.name, dev_envs = dev_envs.len(), "fetched catalog");
            self.dev_envs = Some(dev_envs);
        }
        Ok(self.dev_envs.as_deref().unwrap_or_default())
    }
}

/// All configured catalogs, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    catalogs: Vec<Catalog>,
}

impl CatalogSet {
    #[must_use]
    pub fn new(descriptors: &[CatalogDescriptor]) -> Self {
        Self {
            catalogs: descriptors.iter().cloned().map(Catalog::new).collect(),
        }
    }

    #[must_use]
    pub fn catalogs(&self) -> &[Catalog] {
        &self.catalogs
    }

    /// Fetch every catalog; failures are reported and skipped.
    ///
    /// Returns the catalogs whose content is available.
    pub async fn request_all(
        &mut self,
        fetcher: &impl CatalogFetcher,
        reporter: &impl ProgressReporter,
    ) -> Vec<&Catalog> {
        for catalog in &mut self.catalogs {
            if let Err(e) = catalog.request_dev_envs(fetcher).await {
                reporter.warn(&format!("Skipping catalog '{}': {e}", catalog.name()));
            }
        }
        self.catalogs
            .iter()
            .filter(|c| c.dev_envs().is_some())
            .collect()
    }

    /// Fetch one named catalog, surfacing its error.
    ///
    /// # Errors
    ///
    /// `CatalogError::NotFound` for an unknown name, or the fetch error.
    pub async fn request_one(
        &mut self,
        name: &str,
        fetcher: &impl CatalogFetcher,
    ) -> Result<&Catalog> {
        let catalog = self
            .catalogs
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        catalog.request_dev_envs(fetcher).await?;
        Ok(catalog)
    }

    /// First definition named `name`, scanning catalogs in configuration
    /// order. Failing catalogs are reported and skipped.
    pub async fn get_dev_env_by_name(
        &mut self,
        name: &str,
        fetcher: &impl CatalogFetcher,
        reporter: &impl ProgressReporter,
    ) -> Option<DevEnv> {
        for catalog in &mut self.catalogs {
            match catalog.request_dev_envs(fetcher).await {
                Ok(dev_envs) => {
                    if let Some(env) = dev_envs.iter().find(|e| e.name == name) {
                        return Some(env.clone());
                    }
                }
                Err(e) => reporter.warn(&format!("Skipping catalog '{}': {e}", catalog.name())),
            }
        }
        None
    }
}
