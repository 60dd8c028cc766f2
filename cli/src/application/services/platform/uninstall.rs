//! Uninstall with refcounted image cleanup.
//!
//! The set of images still needed is recomputed from a full scan of every
//! other local DevEnv on each call. No refcount is stored.

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::Platform;
use super::install::list_or_none;
use crate::application::ports::{CollectionStore, ContainerEngine, ProgressReporter};
use crate::domain::{DevEnvError, ToolImage};

/// Outcome of a successful uninstall.
#[derive(Debug, Clone, Default)]
pub struct UninstallReport {
    pub name: String,
    /// Orphaned images removed from the engine.
    pub removed: Vec<ToolImage>,
    /// Images left in place because another DevEnv declares them.
    pub kept: Vec<ToolImage>,
    /// Orphaned images that were already gone.
    pub absent: Vec<ToolImage>,
}

impl<S: CollectionStore> Platform<S> {
    /// Uninstall a DevEnv, removing only images no other DevEnv declares.
    ///
    /// The installed flag is cleared and persisted only after every orphaned
    /// image is removed. A removal failure leaves the flag unchanged; images
    /// removed before it are not restored.
    ///
    /// # Errors
    ///
    /// `DevEnvError::NotFound`, `DevEnvError::NotInstalled`, a
    /// `ContainerEngineError`, or a save failure.
    pub async fn uninstall(
        &mut self,
        name: &str,
        engine: &impl ContainerEngine,
        reporter: &impl ProgressReporter,
    ) -> Result<UninstallReport> {
        let env = self.collection.require(name)?.clone();
        if !env.installed {
            return Err(DevEnvError::NotInstalled(name.to_string()).into());
        }

        let still_needed = self.collection.images_required_by_others(name);
        let local = engine.list_local_images().await?;
        let mut report = UninstallReport {
            name: name.to_string(),
            ..UninstallReport::default()
        };

        for image in env.images() {
            if still_needed.contains(&image) {
                reporter.step(&format!(
                    "Kept {image}: required by another Development Environment"
                ));
                report.kept.push(image);
            } else if !local.contains(&image.reference()) {
                debug!(image = %image, "already absent");
                report.absent.push(image);
            } else {
                reporter.step(&format!("Removing {image}..."));
                engine.remove(&image).await.with_context(|| {
                    format!(
                        "uninstall of '{name}' failed; removed before the failure: {}",
                        list_or_none(&report.removed)
                    )
                })?;
                reporter.success(&format!("Removed {image}"));
                report.removed.push(image);
            }
        }

        let mut next = self.collection.clone();
        next.set_installed(name, false)?;
        self.commit(next).await?;
        info!(
            dev_env = name,
            removed = report.removed.len(),
            kept = report.kept.len(),
            "uninstalled"
        );
        Ok(report)
    }
}
