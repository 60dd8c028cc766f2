//! Application service: the tool image availability index.
//!
//! Combines the local image set from the container engine with the merged
//! registry image set and classifies tools against both. Whether the sets are
//! re-queried before a classification is the caller's choice, expressed with
//! [`Refresh`]; nothing is refreshed implicitly once fetched.

use serde::Serialize;
use tracing::debug;

use crate::application::ports::{ContainerEngine, ProgressReporter, RegistryClient};
use crate::application::services::registry_aggregator::list_all_repos;
use crate::domain::{
    AvailabilityStatus, Classification, ContainerEngineError, ImageSet, Tool, classify_reference,
    classify_tools,
};

/// Which image sets to re-query before classifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Use the sets fetched earlier; fetch only what was never fetched.
    Reuse,
    /// Re-query the local engine, reuse the registry set.
    Local,
    /// Re-query both.
    All,
}

/// Which sources take part in a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Local engine and every configured registry.
    Full,
    /// Registry set forced empty; registries are never contacted.
    LocalOnly,
}

/// An image reference known locally or to a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnownImage {
    pub reference: String,
    pub status: AvailabilityStatus,
}

/// Caches the two image sets between classifications of one command.
pub struct AvailabilityIndex<'a, E, R> {
    engine: &'a E,
    registries: &'a [R],
    local: Option<ImageSet>,
    registry: Option<ImageSet>,
}

impl<'a, E: ContainerEngine, R: RegistryClient> AvailabilityIndex<'a, E, R> {
    #[must_use]
    pub fn new(engine: &'a E, registries: &'a [R]) -> Self {
        Self {
            engine,
            registries,
            local: None,
            registry: None,
        }
    }

    /// The container engine the local set is read from.
    #[must_use]
    pub fn engine(&self) -> &'a E {
        self.engine
    }

    async fn fetch(
        &mut self,
        scope: Scope,
        refresh: Refresh,
        reporter: &impl ProgressReporter,
    ) -> Result<(), ContainerEngineError> {
        if refresh != Refresh::Reuse || self.local.is_none() {
            let local = self.engine.list_local_images().await?;
            debug!(images = local.len(), "listed local images");
            self.local = Some(local);
        }
        if scope == Scope::Full && (refresh == Refresh::All || self.registry.is_none()) {
            let registry = list_all_repos(self.registries, reporter).await;
            debug!(images = registry.len(), "listed registry images");
            self.registry = Some(registry);
        }
        Ok(())
    }

    /// Classify `tools` against the local set and, with [`Scope::Full`], the
    /// registry set.
    ///
    /// A failing registry is reported and skipped; absence from both sets is
    /// a `NotAvailable` status, never an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local engine cannot list its images.
    pub async fn classify(
        &mut self,
        tools: &[Tool],
        scope: Scope,
        refresh: Refresh,
        reporter: &impl ProgressReporter,
    ) -> Result<Classification, ContainerEngineError> {
        self.fetch(scope, refresh, reporter).await?;
        let empty = ImageSet::new();
        let local = self.local.as_ref().unwrap_or(&empty);
        let registry = match scope {
            Scope::Full => self.registry.as_ref().unwrap_or(&empty),
            Scope::LocalOnly => &empty,
        };
        Ok(classify_tools(tools, local, registry))
    }

    /// Every image found locally or in a registry, sorted by reference.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local engine cannot list its images.
    pub async fn known_images(
        &mut self,
        reporter: &impl ProgressReporter,
    ) -> Result<Vec<KnownImage>, ContainerEngineError> {
        self.fetch(Scope::Full, Refresh::Reuse, reporter).await?;
        let empty = ImageSet::new();
        let local = self.local.as_ref().unwrap_or(&empty);
        let registry = self.registry.as_ref().unwrap_or(&empty);

        let mut refs: Vec<&String> = local.union(registry).collect();
        refs.sort();
        Ok(refs
            .into_iter()
            .map(|reference| KnownImage {
                reference: reference.clone(),
                status: classify_reference(reference, local, registry),
            })
            .collect())
    }
}
