//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::DemConfig;

/// Root of all dem state: `$DEM_HOME`, else `~/.dem`.
///
/// # Errors
///
/// Returns an error if `DEM_HOME` is unset and the home directory cannot be
/// determined.
pub fn dem_home() -> Result<PathBuf> {
    if let Some(val) = std::env::var_os("DEM_HOME") {
        return Ok(PathBuf::from(val));
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".dem"))
}

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<DemConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(DemConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: DemConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        for key in crate::domain::config::VALID_CONFIG_KEYS {
            if let Some(value) = config.get(key) {
                crate::domain::validate_config_value(key, &value)
                    .with_context(|| format!("invalid setting in {}", path.display()))?;
            }
        }
        Ok(config)
    }

    fn save(&self, config: &DemConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(val) = std::env::var_os("DEM_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        Ok(dem_home()?.join("config.yaml"))
    }
}
