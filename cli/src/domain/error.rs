//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator, so callers can `downcast_ref` to the kind.

use thiserror::Error;

// ── Catalog errors ────────────────────────────────────────────────────────────

/// An unreachable, corrupt, or misconfigured catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog '{name}' is unreachable: {reason}")]
    Unreachable { name: String, reason: String },

    #[error("Catalog '{name}' returned HTTP {status}")]
    Status { name: String, status: u16 },

    #[error("Catalog '{name}' is corrupt: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("Catalog '{0}' already exists.")]
    AlreadyExists(String),

    #[error("Catalog '{0}' not found.")]
    NotFound(String),
}

// ── Registry errors ───────────────────────────────────────────────────────────

/// A failure scoped to one registry or one repository of a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry '{registry}' is unreachable: {reason}")]
    Unreachable { registry: String, reason: String },

    #[error("Registry '{registry}' returned HTTP {status} for {endpoint}")]
    Status {
        registry: String,
        endpoint: String,
        status: u16,
    },

    #[error("Registry '{registry}' sent a malformed response for {endpoint}: {reason}")]
    Malformed {
        registry: String,
        endpoint: String,
        reason: String,
    },

    #[error("Registry '{registry}' listing at {endpoint} has more than {pages} pages")]
    TooManyPages {
        registry: String,
        endpoint: String,
        pages: usize,
    },

    #[error("Registry '{0}' already exists.")]
    AlreadyExists(String),

    #[error("Registry '{0}' not found.")]
    NotFound(String),
}

// ── Container engine errors ───────────────────────────────────────────────────

/// A local container engine operation failed.
#[derive(Debug, Error)]
#[error("Container engine failed to {operation} {target}: {reason}")]
pub struct ContainerEngineError {
    pub operation: String,
    pub target: String,
    pub reason: String,
}

impl ContainerEngineError {
    #[must_use]
    pub fn new(operation: &str, target: &str, reason: impl Into<String>) -> Self {
        Self {
            operation: operation.to_string(),
            target: target.to_string(),
            reason: reason.into(),
        }
    }
}

// ── Persisted state errors ────────────────────────────────────────────────────

/// The persisted DevEnv document cannot be trusted. Never auto-repaired.
#[derive(Debug, Error)]
pub enum DataStorageError {
    #[error("DevEnv document {path} is unreadable: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("DevEnv document {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("DevEnv document {path} could not be written: {reason}")]
    WriteFailed { path: String, reason: String },
}

/// The persisted document was written by an incompatible major version.
#[derive(Debug, Error)]
#[error(
    "DevEnv document version {found} is not supported (this build reads {supported}.x). \
No migration is available."
)]
pub struct InvalidDocumentVersion {
    pub found: String,
    pub supported: u32,
}

// ── DevEnv errors ─────────────────────────────────────────────────────────────

/// Errors related to DevEnv lifecycle and identity.
#[derive(Debug, Error)]
pub enum DevEnvError {
    #[error("Development Environment '{0}' not found.")]
    NotFound(String),

    #[error("Development Environment '{0}' already exists.")]
    AlreadyExists(String),

    #[error("Development Environment '{0}' is installed. Uninstall it first: dem uninstall {0}")]
    Installed(String),

    #[error("Development Environment '{0}' is not installed.")]
    NotInstalled(String),

    #[error("Development Environment '{name}' could not be installed; unavailable tools: {missing}")]
    InstallIncomplete { name: String, missing: String },

    #[error("Invalid Development Environment name '{0}': must be 1-64 characters without whitespace or '/'")]
    InvalidName(String),

    #[error("Invalid tool selection: {0}")]
    InvalidTool(String),

    #[error("No Development Environment given and no default is set. Set one: dem set-default <name>")]
    NoDefault,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

/// Stable machine-readable code for an error chain, used by `--json` output.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<CatalogError>().is_some() {
        "catalog_error"
    } else if err.downcast_ref::<RegistryError>().is_some() {
        "registry_error"
    } else if err.downcast_ref::<ContainerEngineError>().is_some() {
        "container_engine_error"
    } else if err.downcast_ref::<DataStorageError>().is_some() {
        "data_storage_error"
    } else if err.downcast_ref::<InvalidDocumentVersion>().is_some() {
        "invalid_document_version"
    } else if err.downcast_ref::<DevEnvError>().is_some() {
        "dev_env_error"
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "config_error"
    } else {
        "error"
    }
}
