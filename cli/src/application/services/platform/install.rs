//! Install: pull what the registries can supply, then mark installed.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use tracing::info;

use super::Platform;
use crate::application::ports::{
    CollectionStore, ContainerEngine, ProgressReporter, RegistryClient,
};
use crate::application::services::availability::{AvailabilityIndex, Refresh, Scope};
use crate::domain::{AvailabilityStatus, Classification, DevEnvError, ToolImage};

/// Outcome of a successful install.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub name: String,
    /// Images pulled during this install, in reference order.
    pub pulled: Vec<ToolImage>,
    /// Classification after the pull phase; every tool is local.
    pub classification: Classification,
}

impl<S: CollectionStore> Platform<S> {
    /// Install a local DevEnv.
    ///
    /// Tools only a registry can supply are pulled one at a time. The DevEnv
    /// is marked installed and persisted only if every tool is local
    /// afterwards; otherwise nothing is written. Images pulled before a
    /// failure stay on the machine.
    ///
    /// # Errors
    ///
    /// `DevEnvError::NotFound`, the first `ContainerEngineError` of a pull,
    /// `DevEnvError::InstallIncomplete` when tools are still missing, or a
    /// save failure.
    pub async fn install<E: ContainerEngine, R: RegistryClient>(
        &mut self,
        name: &str,
        index: &mut AvailabilityIndex<'_, E, R>,
        reporter: &impl ProgressReporter,
    ) -> Result<InstallReport> {
        let env = self.collection.require(name)?.clone();

        let before = index
            .classify(env.tools(), Scope::Full, Refresh::All, reporter)
            .await?;
        let to_pull: BTreeSet<&ToolImage> = before
            .with_status(AvailabilityStatus::RegistryOnly)
            .map(|t| &t.tool.image)
            .collect();

        let mut pulled = Vec::new();
        for image in to_pull {
            reporter.step(&format!("Pulling {image}..."));
            index.engine().pull(image).await.with_context(|| {
                format!(
                    "install of '{name}' aborted; pulled before the failure: {}",
                    list_or_none(&pulled)
                )
            })?;
            reporter.success(&format!("Pulled {image}"));
            pulled.push(image.clone());
        }

        let after = index
            .classify(env.tools(), Scope::Full, Refresh::Local, reporter)
            .await?;
        if !after.is_complete() {
            let missing = after
                .missing()
                .map(|t| format!("{} ({})", t.tool.image, t.status))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(DevEnvError::InstallIncomplete {
                name: name.to_string(),
                missing,
            }
            .into());
        }

        let mut next = self.collection.clone();
        next.set_installed(name, true)?;
        self.commit(next).await?;
        info!(dev_env = name, pulled = pulled.len(), "installed");

        Ok(InstallReport {
            name: name.to_string(),
            pulled,
            classification: after,
        })
    }
}

pub(super) fn list_or_none(images: &[ToolImage]) -> String {
    if images.is_empty() {
        "none".to_string()
    } else {
        images
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
