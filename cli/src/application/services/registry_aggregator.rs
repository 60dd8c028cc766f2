//! Application service: merge image availability across registries.
//!
//! Every registry and every repository is its own failure domain: a failing
//! unit is reported through the `ProgressReporter` and skipped, and the
//! aggregation carries on with the rest. Registries are queried one after
//! another.

use tracing::debug;

use crate::application::ports::{ProgressReporter, RegistryClient};
use crate::domain::{ImageSet, RegistryError};

/// Every `name:tag` reference one registry can supply.
///
/// Repositories whose tag listing fails are reported and skipped.
///
/// # Errors
///
/// Returns the registry-level error when the repository listing itself fails.
pub async fn list_registry_repos(
    registry: &impl RegistryClient,
    reporter: &impl ProgressReporter,
) -> Result<ImageSet, RegistryError> {
    let repositories = registry.list_repositories().await?;
    debug!(
        registry = registry.name(),
        repositories = repositories.len(),
        "listed repositories"
    );

    let mut images = ImageSet::new();
    for repository in &repositories {
        match registry.list_tags(repository).await {
            Ok(tags) => {
                let name = registry.image_name(repository);
                images.extend(tags.iter().map(|tag| format!("{name}:{tag}")));
            }
            Err(e) => reporter.warn(&format!(
                "Skipping repository '{repository}' of registry '{}': {e}",
                registry.name()
            )),
        }
    }
    Ok(images)
}

/// Union of the images of every configured registry.
///
/// Never fails: a registry that cannot be listed is reported and skipped.
/// Duplicates across registries collapse.
pub async fn list_all_repos(
    registries: &[impl RegistryClient],
    reporter: &impl ProgressReporter,
) -> ImageSet {
    let mut all = ImageSet::new();
    for registry in registries {
        match list_registry_repos(registry, reporter).await {
            Ok(images) => all.extend(images),
            Err(e) => reporter.warn(&format!("Skipping registry '{}': {e}", registry.name())),
        }
    }
    all
}
