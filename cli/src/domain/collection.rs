//! The local DevEnv collection: the only persisted mutable state.
//!
//! Holds the DevEnvs together with the registry and catalog configuration
//! (name and URL only, never cached content). Pure data in, data out.

use std::collections::BTreeSet;

use anyhow::Result;
use dem_common::{
    CURRENT_VERSION, CatalogDescriptor, DevEnvDocument, DocumentVersion, RegistryDescriptor,
    SUPPORTED_MAJOR,
};

use crate::domain::dev_env::DevEnv;
use crate::domain::error::{
    CatalogError, DataStorageError, DevEnvError, InvalidDocumentVersion, RegistryError,
};
use crate::domain::tool::ToolImage;

/// In-memory snapshot of `dev_env.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DevEnvCollection {
    dev_envs: Vec<DevEnv>,
    registries: Vec<RegistryDescriptor>,
    catalogs: Vec<CatalogDescriptor>,
}

impl DevEnvCollection {
    /// Validate and convert a loaded document. `origin` names the document in
    /// error messages.
    ///
    /// # Errors
    ///
    /// `InvalidDocumentVersion` for another major version; `DataStorageError`
    /// for a malformed version, invalid DevEnvs, duplicate names, or more than
    /// one default DevEnv.
    pub fn from_document(doc: &DevEnvDocument, origin: &str) -> Result<Self> {
        let corrupt = |reason: String| DataStorageError::Corrupt {
            path: origin.to_string(),
            reason,
        };

        let version: DocumentVersion = doc.version.parse().map_err(|e| corrupt(format!("{e}")))?;
        if !version.is_supported() {
            return Err(InvalidDocumentVersion {
                found: doc.version.clone(),
                supported: SUPPORTED_MAJOR,
            }
            .into());
        }

        let mut collection = Self::default();
        for d in &doc.development_environments {
            let env = DevEnv::from_descriptor(d).map_err(|e| corrupt(e.to_string()))?;
            collection
                .add(env)
                .map_err(|e| corrupt(e.to_string()))?;
        }
        if collection.dev_envs.iter().filter(|e| e.default).count() > 1 {
            return Err(corrupt("more than one default Development Environment".into()).into());
        }
        for r in &doc.registries {
            collection
                .add_registry(r.clone())
                .map_err(|e| corrupt(e.to_string()))?;
        }
        for c in &doc.catalogs {
            collection
                .add_catalog(c.clone())
                .map_err(|e| corrupt(e.to_string()))?;
        }
        Ok(collection)
    }

    /// The full document for persistence, always at the current version.
    #[must_use]
    pub fn to_document(&self) -> DevEnvDocument {
        DevEnvDocument {
            version: CURRENT_VERSION.to_string(),
            registries: self.registries.clone(),
            catalogs: self.catalogs.clone(),
            development_environments: self.dev_envs.iter().map(DevEnv::to_descriptor).collect(),
        }
    }

    // ── DevEnvs ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn dev_envs(&self) -> &[DevEnv] {
        &self.dev_envs
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DevEnv> {
        self.dev_envs.iter().find(|e| e.name == name)
    }

    /// # Errors
    ///
    /// Returns `DevEnvError::NotFound` if there is no DevEnv with this name.
    pub fn require(&self, name: &str) -> Result<&DevEnv, DevEnvError> {
        self.get(name)
            .ok_or_else(|| DevEnvError::NotFound(name.to_string()))
    }

    fn require_mut(&mut self, name: &str) -> Result<&mut DevEnv, DevEnvError> {
        self.dev_envs
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| DevEnvError::NotFound(name.to_string()))
    }

    /// # Errors
    ///
    /// Returns `DevEnvError::AlreadyExists` on a name clash.
    pub fn add(&mut self, env: DevEnv) -> Result<(), DevEnvError> {
        if self.get(&env.name).is_some() {
            return Err(DevEnvError::AlreadyExists(env.name));
        }
        self.dev_envs.push(env);
        Ok(())
    }

    /// Replace the DevEnv with the same name.
    ///
    /// # Errors
    ///
    /// Returns `DevEnvError::NotFound` if no DevEnv has that name.
    pub fn replace(&mut self, env: DevEnv) -> Result<(), DevEnvError> {
        let slot = self.require_mut(&env.name)?;
        *slot = env;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DevEnvError::NotFound` if no DevEnv has that name.
    pub fn remove(&mut self, name: &str) -> Result<DevEnv, DevEnvError> {
        let idx = self
            .dev_envs
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| DevEnvError::NotFound(name.to_string()))?;
        Ok(self.dev_envs.remove(idx))
    }

    /// # Errors
    ///
    /// Returns an error if `old` is missing, `new` exists, or `new` is invalid.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), DevEnvError> {
        crate::domain::dev_env::validate_dev_env_name(new)?;
        if self.get(new).is_some() {
            return Err(DevEnvError::AlreadyExists(new.to_string()));
        }
        self.require_mut(old)?.name = new.to_string();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DevEnvError::NotFound` if no DevEnv has that name.
    pub fn set_installed(&mut self, name: &str, installed: bool) -> Result<(), DevEnvError> {
        self.require_mut(name)?.installed = installed;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DevEnvError::Installed` if the DevEnv is installed.
    pub fn ensure_uninstalled(&self, name: &str) -> Result<&DevEnv, DevEnvError> {
        let env = self.require(name)?;
        if env.installed {
            return Err(DevEnvError::Installed(name.to_string()));
        }
        Ok(env)
    }

    #[must_use]
    pub fn default_dev_env(&self) -> Option<&DevEnv> {
        self.dev_envs.iter().find(|e| e.default)
    }

    /// Make `name` the only default DevEnv, or clear the default with `None`.
    ///
    /// # Errors
    ///
    /// Returns `DevEnvError::NotFound` if `name` does not exist.
    pub fn set_default(&mut self, name: Option<&str>) -> Result<(), DevEnvError> {
        if let Some(name) = name {
            self.require(name)?;
        }
        for env in &mut self.dev_envs {
            env.default = name == Some(env.name.as_str());
        }
        Ok(())
    }

    /// Images declared by any DevEnv other than `name`.
    ///
    /// Recomputed from a full scan on every call.
    #[must_use]
    pub fn images_required_by_others(&self, name: &str) -> BTreeSet<ToolImage> {
        self.dev_envs
            .iter()
            .filter(|e| e.name != name)
            .flat_map(DevEnv::images)
            .collect()
    }

    // ── Registries ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn registries(&self) -> &[RegistryDescriptor] {
        &self.registries
    }

    /// # Errors
    ///
    /// Returns `RegistryError::AlreadyExists` on a name clash.
    pub fn add_registry(&mut self, registry: RegistryDescriptor) -> Result<(), RegistryError> {
        if self.registries.iter().any(|r| r.name == registry.name) {
            return Err(RegistryError::AlreadyExists(registry.name));
        }
        self.registries.push(registry);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no registry has that name.
    pub fn remove_registry(&mut self, name: &str) -> Result<RegistryDescriptor, RegistryError> {
        let idx = self
            .registries
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        Ok(self.registries.remove(idx))
    }

    // ── Catalogs ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn catalogs(&self) -> &[CatalogDescriptor] {
        &self.catalogs
    }

    /// # Errors
    ///
    /// Returns `CatalogError::AlreadyExists` on a name clash; the list is
    /// left unchanged.
    pub fn add_catalog(&mut self, catalog: CatalogDescriptor) -> Result<(), CatalogError> {
        if self.catalogs.iter().any(|c| c.name == catalog.name) {
            return Err(CatalogError::AlreadyExists(catalog.name));
        }
        self.catalogs.push(catalog);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no catalog has that name.
    pub fn remove_catalog(&mut self, name: &str) -> Result<CatalogDescriptor, CatalogError> {
        let idx = self
            .catalogs
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        Ok(self.catalogs.remove(idx))
    }
}
