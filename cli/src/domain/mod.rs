//! Domain layer: pure types and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod availability;
pub mod collection;
pub mod config;
pub mod dev_env;
pub mod error;
pub mod tool;

pub use availability::{
    AvailabilityStatus, Classification, ImageSet, ToolAvailability, classify_image, classify_reference,
    classify_tools,
};
pub use collection::DevEnvCollection;
pub use config::{DemConfig, validate_config_key, validate_config_value};
pub use dev_env::{DevEnv, DevEnvState, validate_dev_env_name};
pub use error::{
    CatalogError, ConfigError, ContainerEngineError, DataStorageError, DevEnvError,
    InvalidDocumentVersion, RegistryError,
};
pub use tool::{Tool, ToolImage};
