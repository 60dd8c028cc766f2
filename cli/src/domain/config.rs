//! Domain types and validators for dem configuration.
//!
//! Pure functions only. No I/O.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "http.timeout_secs",
    "engine.program",
    "engine.timeout_secs",
    "engine.pull_timeout_secs",
    "registry.hub_api",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.dem/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DemConfig {
    pub http: HttpConfig,
    pub engine: EngineConfig,
    pub registry: RegistryConfig,
}

/// Network settings shared by registry and catalog clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Container engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine CLI program, e.g. `docker` or `podman`.
    pub program: String,
    /// Timeout for listing and removing images.
    pub timeout_secs: u64,
    /// Timeout for pulling a single image.
    pub pull_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            timeout_secs: 30,
            pull_timeout_secs: 600,
        }
    }
}

/// Registry API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the Hub-style repository/tag API.
    pub hub_api: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            hub_api: "https://hub.docker.com".to_string(),
        }
    }
}

impl DemConfig {
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    #[must_use]
    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine.timeout_secs)
    }

    #[must_use]
    pub fn pull_timeout(&self) -> Duration {
        Duration::from_secs(self.engine.pull_timeout_secs)
    }

    /// Current value of a whitelisted key, rendered as text.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "http.timeout_secs" => Some(self.http.timeout_secs.to_string()),
            "engine.program" => Some(self.engine.program.clone()),
            "engine.timeout_secs" => Some(self.engine.timeout_secs.to_string()),
            "engine.pull_timeout_secs" => Some(self.engine.pull_timeout_secs.to_string()),
            "registry.hub_api" => Some(self.registry.hub_api.clone()),
            _ => None,
        }
    }

    /// Validate and apply `key = value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid for it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "http.timeout_secs" => self.http.timeout_secs = parse_secs(key, value)?,
            "engine.program" => self.engine.program = value.to_string(),
            "engine.timeout_secs" => self.engine.timeout_secs = parse_secs(key, value)?,
            "engine.pull_timeout_secs" => self.engine.pull_timeout_secs = parse_secs(key, value)?,
            "registry.hub_api" => self.registry.hub_api = value.trim_end_matches('/').to_string(),
            other => validate_config_key(other)?,
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    match key {
        "http.timeout_secs" | "engine.timeout_secs" | "engine.pull_timeout_secs" => {
            parse_secs(key, value).map(|_| ())
        }
        "engine.program" if value.trim().is_empty() => Err(invalid(key, value, "a program name")),
        "registry.hub_api" if !(value.starts_with("http://") || value.starts_with("https://")) => {
            Err(invalid(key, value, "an http(s) URL"))
        }
        _ => Ok(()),
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(invalid(key, value, "a positive number of seconds")),
    }
}

fn invalid(key: &str, value: &str, expected: &str) -> anyhow::Error {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
    .into()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
