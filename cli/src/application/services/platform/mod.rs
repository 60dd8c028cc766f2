//! Application service: the reconciliation engine.
//!
//! `Platform` owns the local DevEnv collection and is its only writer. Every
//! mutating operation builds the next collection on a copy, persists the full
//! snapshot through the `CollectionStore`, and only then swaps it in, so a
//! failed save leaves memory and disk in agreement.

mod health;
mod install;
mod uninstall;

pub use health::HealthReport;
pub use install::InstallReport;
pub use uninstall::UninstallReport;

use anyhow::Result;
use dem_common::{CatalogDescriptor, RegistryDescriptor, ToolType};
use tracing::debug;

use crate::application::ports::CollectionStore;
use crate::domain::{DevEnv, DevEnvCollection, DevEnvError, Tool};

/// The reconciliation engine over one persisted collection.
pub struct Platform<S> {
    store: S,
    collection: DevEnvCollection,
}

impl<S: CollectionStore> Platform<S> {
    /// Load the persisted collection.
    ///
    /// # Errors
    ///
    /// Propagates `DataStorageError` and `InvalidDocumentVersion` from the
    /// store. Neither is repaired.
    pub async fn load(store: S) -> Result<Self> {
        let collection = store.load().await?;
        debug!(dev_envs = collection.dev_envs().len(), "loaded collection");
        Ok(Self { store, collection })
    }

    #[must_use]
    pub fn collection(&self) -> &DevEnvCollection {
        &self.collection
    }

    /// Local DevEnv by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&DevEnv> {
        self.collection.get(name)
    }

    /// Local DevEnv by name, or the default one when `name` is `None`.
    ///
    /// # Errors
    ///
    /// `DevEnvError::NotFound` or `DevEnvError::NoDefault`.
    pub fn resolve(&self, name: Option<&str>) -> Result<&DevEnv, DevEnvError> {
        match name {
            Some(name) => self.collection.require(name),
            None => self
                .collection
                .default_dev_env()
                .ok_or(DevEnvError::NoDefault),
        }
    }

    async fn commit(&mut self, next: DevEnvCollection) -> Result<()> {
        self.store.save(&next).await?;
        self.collection = next;
        Ok(())
    }

    /// Add a new uninstalled DevEnv.
    ///
    /// # Errors
    ///
    /// `DevEnvError::AlreadyExists` on a name clash, or a save failure.
    pub async fn create(&mut self, env: DevEnv) -> Result<()> {
        let mut next = self.collection.clone();
        next.add(env)?;
        self.commit(next).await
    }

    /// Add a definition from a catalog or a descriptor file.
    ///
    /// With `replace`, an existing uninstalled DevEnv of the same name is
    /// overwritten and keeps its default flag.
    ///
    /// # Errors
    ///
    /// `DevEnvError::AlreadyExists` without `replace`, `DevEnvError::Installed`
    /// when the DevEnv to replace is installed, or a save failure.
    pub async fn import(&mut self, env: DevEnv, replace: bool) -> Result<()> {
        let mut next = self.collection.clone();
        stage_import(&mut next, env, replace)?;
        self.commit(next).await
    }

    /// Add several new definitions in one save. Any clash leaves the
    /// collection untouched.
    ///
    /// # Errors
    ///
    /// `DevEnvError::AlreadyExists` for the first name already taken, locally
    /// or earlier in `envs`, or a save failure.
    pub async fn import_all(&mut self, envs: Vec<DevEnv>) -> Result<()> {
        let mut next = self.collection.clone();
        for env in envs {
            stage_import(&mut next, env, false)?;
        }
        self.commit(next).await
    }

    /// Delete an uninstalled DevEnv.
    ///
    /// # Errors
    ///
    /// `DevEnvError::Installed` or `DevEnvError::NotFound`, or a save failure.
    pub async fn delete(&mut self, name: &str) -> Result<DevEnv> {
        let mut next = self.collection.clone();
        next.ensure_uninstalled(name)?;
        let removed = next.remove(name)?;
        self.commit(next).await?;
        Ok(removed)
    }

    /// Replace or add tools by type and drop the `removed` types.
    ///
    /// # Errors
    ///
    /// `DevEnvError::Installed` for an installed DevEnv, an invalid tool set,
    /// or a save failure.
    pub async fn modify(&mut self, name: &str, set: Vec<Tool>, removed: &[ToolType]) -> Result<()> {
        let mut next = self.collection.clone();
        let mut env = next.ensure_uninstalled(name)?.clone();
        env.edit_tools(set, removed)?;
        next.replace(env)?;
        self.commit(next).await
    }

    /// # Errors
    ///
    /// `DevEnvError::Installed` for an installed DevEnv, an invalid or taken
    /// new name, or a save failure.
    pub async fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let mut next = self.collection.clone();
        next.ensure_uninstalled(old)?;
        next.rename(old, new)?;
        self.commit(next).await
    }

    /// Copy `src` to `dst`. The copy starts uninstalled and non-default.
    ///
    /// # Errors
    ///
    /// `DevEnvError::NotFound`, an invalid or taken name, or a save failure.
    pub async fn copy(&mut self, src: &str, dst: &str) -> Result<()> {
        let mut next = self.collection.clone();
        let copy = next.require(src)?.duplicate(dst)?;
        next.add(copy)?;
        self.commit(next).await
    }

    /// Make `name` the only default DevEnv, or clear the default.
    ///
    /// # Errors
    ///
    /// `DevEnvError::NotFound`, or a save failure.
    pub async fn set_default(&mut self, name: Option<&str>) -> Result<()> {
        let mut next = self.collection.clone();
        next.set_default(name)?;
        self.commit(next).await
    }

    /// # Errors
    ///
    /// `RegistryError::AlreadyExists`, or a save failure.
    pub async fn add_registry(&mut self, registry: RegistryDescriptor) -> Result<()> {
        let mut next = self.collection.clone();
        next.add_registry(registry)?;
        self.commit(next).await
    }

    /// # Errors
    ///
    /// `RegistryError::NotFound`, or a save failure.
    pub async fn remove_registry(&mut self, name: &str) -> Result<RegistryDescriptor> {
        let mut next = self.collection.clone();
        let removed = next.remove_registry(name)?;
        self.commit(next).await?;
        Ok(removed)
    }

    /// # Errors
    ///
    /// `CatalogError::AlreadyExists` (configuration left unchanged), or a
    /// save failure.
    pub async fn add_catalog(&mut self, catalog: CatalogDescriptor) -> Result<()> {
        let mut next = self.collection.clone();
        next.add_catalog(catalog)?;
        self.commit(next).await
    }

    /// # Errors
    ///
    /// `CatalogError::NotFound`, or a save failure.
    pub async fn remove_catalog(&mut self, name: &str) -> Result<CatalogDescriptor> {
        let mut next = self.collection.clone();
        let removed = next.remove_catalog(name)?;
        self.commit(next).await?;
        Ok(removed)
    }
}

fn stage_import(next: &mut DevEnvCollection, mut env: DevEnv, replace: bool) -> Result<()> {
    env.installed = false;
    if next.get(&env.name).is_none() {
        env.default = false;
        next.add(env)?;
    } else if replace {
        env.default = next.ensure_uninstalled(&env.name)?.default;
        next.replace(env)?;
    } else {
        return Err(DevEnvError::AlreadyExists(env.name).into());
    }
    Ok(())
}
