//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed JSON value to
//! stdout. Progress and skip notices go to stderr so stdout stays parseable.

use std::path::Path;

use anyhow::{Context, Result};
use dem_common::{CatalogDescriptor, RegistryDescriptor};
use serde_json::{Value, json};

use crate::application::services::{Catalog, InstallReport, KnownImage, UninstallReport};
use crate::domain::{Classification, DemConfig, DevEnv, DevEnvState, ToolImage};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

fn emit(value: &Value) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}

fn tools_json(classification: &Classification) -> Value {
    classification
        .tools
        .iter()
        .map(|t| {
            json!({
                "type": t.tool.tool_type,
                "image_name": t.tool.image.name,
                "image_version": t.tool.image.version,
                "status": t.status,
            })
        })
        .collect()
}

fn images_json(images: &[ToolImage]) -> Value {
    images.iter().map(ToolImage::reference).collect()
}

/// Renders domain types as JSON documents on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn render_done(&self, message: &str) -> Result<()> {
        emit(&json!({ "ok": true, "message": message }))
    }

    pub fn render_dev_env_list(&self, rows: &[(&DevEnv, DevEnvState)]) -> Result<()> {
        let envs: Vec<Value> = rows
            .iter()
            .map(|(env, state)| {
                json!({
                    "name": env.name,
                    "state": state,
                    "installed": env.installed,
                    "default": env.default,
                    "tools": env.to_descriptor().tools,
                })
            })
            .collect();
        emit(&json!({ "development_environments": envs }))
    }

    pub fn render_catalog_dev_envs(&self, catalogs: &[&Catalog]) -> Result<()> {
        let catalogs: Vec<Value> = catalogs
            .iter()
            .map(|c| {
                let envs: Vec<Value> = c
                    .dev_envs()
                    .unwrap_or_default()
                    .iter()
                    .map(|e| json!({ "name": e.name, "tools": e.to_descriptor().tools }))
                    .collect();
                json!({ "name": c.name(), "url": c.url(), "development_environments": envs })
            })
            .collect();
        emit(&json!({ "catalogs": catalogs }))
    }

    pub fn render_dev_env_info(
        &self,
        env: &DevEnv,
        state: Option<DevEnvState>,
        classification: &Classification,
    ) -> Result<()> {
        emit(&json!({
            "name": env.name,
            "state": state,
            "installed": env.installed,
            "default": env.default,
            "tools": tools_json(classification),
        }))
    }

    pub fn render_install(&self, report: &InstallReport) -> Result<()> {
        emit(&json!({
            "name": report.name,
            "installed": true,
            "pulled": images_json(&report.pulled),
            "tools": tools_json(&report.classification),
        }))
    }

    pub fn render_uninstall(&self, report: &UninstallReport) -> Result<()> {
        emit(&json!({
            "name": report.name,
            "installed": false,
            "removed": images_json(&report.removed),
            "kept": images_json(&report.kept),
            "absent": images_json(&report.absent),
        }))
    }

    pub fn render_known_images(&self, images: &[KnownImage]) -> Result<()> {
        emit(&json!({ "images": images }))
    }

    pub fn render_registries(&self, rows: &[(&RegistryDescriptor, Option<usize>)]) -> Result<()> {
        let registries: Vec<Value> = rows
            .iter()
            .map(|(r, images)| {
                json!({
                    "name": r.name,
                    "url": r.url,
                    "kind": r.effective_kind(),
                    "images": images,
                })
            })
            .collect();
        emit(&json!({ "registries": registries }))
    }

    pub fn render_catalogs(&self, catalogs: &[CatalogDescriptor]) -> Result<()> {
        emit(&json!({ "catalogs": catalogs }))
    }

    pub fn render_config(&self, config: &DemConfig, path: &Path) -> Result<()> {
        emit(&json!({ "path": path, "config": config }))
    }
}
