//! Human-readable terminal renderer.

use std::path::Path;

use dem_common::{CatalogDescriptor, RegistryDescriptor};
use owo_colors::OwoColorize as _;

use crate::application::services::{Catalog, InstallReport, KnownImage, UninstallReport};
use crate::domain::{Classification, DemConfig, DevEnv, DevEnvState, ToolImage};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Confirmation of a completed mutation.
    pub fn render_done(&self, message: &str) {
        self.ctx.success(message);
    }

    /// Local DevEnvs with their state and the default marker.
    pub fn render_dev_env_list(&self, rows: &[(&DevEnv, DevEnvState)]) {
        if self.ctx.quiet {
            return;
        }
        if rows.is_empty() {
            println!(
                "No Development Environments. Get one: dem clone <name> or dem create <name> --tool TYPE=IMAGE:TAG"
            );
            return;
        }
        println!("Development Environments:\n");
        for (env, state) in rows {
            let marker = if env.default { "  [default]" } else { "" };
            println!(
                "  {:<24} {:<14} {} tools{marker}",
                env.name,
                state.label().style(self.ctx.styles.state(*state)),
                env.tools().len()
            );
        }
    }

    /// DevEnv definitions of each reachable catalog.
    pub fn render_catalog_dev_envs(&self, catalogs: &[&Catalog]) {
        if self.ctx.quiet {
            return;
        }
        if catalogs.is_empty() {
            println!("No catalog content available. Add one: dem catalog add <name> <url>");
            return;
        }
        for catalog in catalogs {
            println!("{}", catalog.name().style(self.ctx.styles.header));
            match catalog.dev_envs() {
                Some(envs) if !envs.is_empty() => {
                    for env in envs {
                        println!("  {:<24} {} tools", env.name, env.tools().len());
                    }
                }
                _ => println!("  {}", "(empty)".style(self.ctx.styles.dim)),
            }
        }
    }

    /// Tool table with live availability status.
    pub fn render_dev_env_info(
        &self,
        env: &DevEnv,
        state: Option<DevEnvState>,
        classification: &Classification,
    ) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.header(&env.name);
        if let Some(state) = state {
            self.ctx.kv("State:  ", state.label());
        }
        if env.default {
            self.ctx.kv("Default:", "yes");
        }
        println!();
        for t in &classification.tools {
            println!(
                "  {:<16} {:<48} {}",
                t.tool.tool_type.label(),
                t.tool.image.reference(),
                t.status.label().style(self.ctx.styles.availability(t.status))
            );
        }
    }

    pub fn render_install(&self, report: &InstallReport) {
        if report.pulled.is_empty() {
            self.ctx.info("Every tool image was already present locally");
        }
        self.ctx
            .success(&format!("Installed Development Environment '{}'", report.name));
    }

    pub fn render_uninstall(&self, report: &UninstallReport) {
        if !report.absent.is_empty() {
            self.ctx
                .info(&format!("Already absent: {}", join_images(&report.absent)));
        }
        self.ctx
            .success(&format!("Uninstalled Development Environment '{}'", report.name));
    }

    /// Every known image with its availability.
    pub fn render_known_images(&self, images: &[KnownImage]) {
        if self.ctx.quiet {
            return;
        }
        if images.is_empty() {
            println!("No tool images found locally or in any registry.");
            return;
        }
        for image in images {
            println!(
                "  {:<56} {}",
                image.reference,
                image.status.label().style(self.ctx.styles.availability(image.status))
            );
        }
    }

    /// Configured registries; `images` is `None` for a skipped registry.
    pub fn render_registries(&self, rows: &[(&RegistryDescriptor, Option<usize>)]) {
        if self.ctx.quiet {
            return;
        }
        if rows.is_empty() {
            println!("No registries configured. Add one: dem registry add <name> <url>");
            return;
        }
        for (registry, images) in rows {
            let count = images.map_or_else(
                || "unavailable".style(self.ctx.styles.error).to_string(),
                |n| format!("{n} images"),
            );
            println!(
                "  {:<16} {:<4} {:<40} {count}",
                registry.name,
                registry.effective_kind().to_string(),
                registry.url
            );
        }
    }

    pub fn render_catalogs(&self, catalogs: &[CatalogDescriptor]) {
        if self.ctx.quiet {
            return;
        }
        if catalogs.is_empty() {
            println!("No catalogs configured. Add one: dem catalog add <name> <url>");
            return;
        }
        for catalog in catalogs {
            println!("  {:<16} {}", catalog.name, catalog.url);
        }
    }

    /// Render the current dem configuration.
    pub fn render_config(&self, config: &DemConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for key in crate::domain::config::VALID_CONFIG_KEYS {
            let value = config.get(key).unwrap_or_default();
            println!("  {:<28} {value}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["DEM_HOME", "DEM_CONFIG", "DEM_LOG", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }
}

fn join_images(images: &[ToolImage]) -> String {
    images
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
