//! Health check used before running a task.

use anyhow::Result;

use super::Platform;
use crate::application::ports::{
    CollectionStore, ContainerEngine, ProgressReporter, RegistryClient,
};
use crate::application::services::availability::{AvailabilityIndex, Refresh, Scope};
use crate::domain::{Classification, DevEnvState};

/// Local presence of every tool of one DevEnv.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub name: String,
    pub state: DevEnvState,
    pub classification: Classification,
}

impl HealthReport {
    /// Whether the DevEnv must be installed before it is safe to run: it
    /// was never installed, or some tool image is missing locally. Repair is
    /// a confirmed install, never automatic.
    #[must_use]
    pub fn needs_repair(&self) -> bool {
        self.state != DevEnvState::Installed
    }
}

impl<S: CollectionStore> Platform<S> {
    /// Re-classify a DevEnv against the local engine only.
    ///
    /// Registries are not contacted, so this works offline.
    ///
    /// # Errors
    ///
    /// `DevEnvError::NotFound`, or a `ContainerEngineError` from listing.
    pub async fn health_check<E: ContainerEngine, R: RegistryClient>(
        &self,
        name: &str,
        index: &mut AvailabilityIndex<'_, E, R>,
        reporter: &impl ProgressReporter,
    ) -> Result<HealthReport> {
        let env = self.collection.require(name)?;
        let classification = index
            .classify(env.tools(), Scope::LocalOnly, Refresh::Local, reporter)
            .await?;
        Ok(HealthReport {
            name: name.to_string(),
            state: env.state(&classification),
            classification,
        })
    }
}
