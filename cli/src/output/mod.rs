//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use dem_common::{CatalogDescriptor, RegistryDescriptor};
use owo_colors::OwoColorize as _;

use crate::application::services::{Catalog, InstallReport, KnownImage, UninstallReport};
use crate::domain::{Classification, DemConfig, DevEnv, DevEnvState};

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var_os("NO_COLOR").is_none();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Human or JSON rendering, chosen once per invocation.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

macro_rules! dispatch {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {
        match $self {
            Renderer::Human(r) => {
                r.$method($($arg),*);
                Ok(())
            }
            Renderer::Json(r) => r.$method($($arg),*),
        }
    };
}

impl Renderer<'_> {
    /// # Errors
    ///
    /// JSON serialization failures only; the same holds for every method.
    pub fn done(&self, message: &str) -> Result<()> {
        dispatch!(self, render_done(message))
    }

    pub fn dev_env_list(&self, rows: &[(&DevEnv, DevEnvState)]) -> Result<()> {
        dispatch!(self, render_dev_env_list(rows))
    }

    pub fn catalog_dev_envs(&self, catalogs: &[&Catalog]) -> Result<()> {
        dispatch!(self, render_catalog_dev_envs(catalogs))
    }

    pub fn dev_env_info(
        &self,
        env: &DevEnv,
        state: Option<DevEnvState>,
        classification: &Classification,
    ) -> Result<()> {
        dispatch!(self, render_dev_env_info(env, state, classification))
    }

    pub fn install(&self, report: &InstallReport) -> Result<()> {
        dispatch!(self, render_install(report))
    }

    pub fn uninstall(&self, report: &UninstallReport) -> Result<()> {
        dispatch!(self, render_uninstall(report))
    }

    pub fn known_images(&self, images: &[KnownImage]) -> Result<()> {
        dispatch!(self, render_known_images(images))
    }

    pub fn registries(&self, rows: &[(&RegistryDescriptor, Option<usize>)]) -> Result<()> {
        dispatch!(self, render_registries(rows))
    }

    pub fn catalogs(&self, catalogs: &[CatalogDescriptor]) -> Result<()> {
        dispatch!(self, render_catalogs(catalogs))
    }

    pub fn config(&self, config: &DemConfig, path: &Path) -> Result<()> {
        dispatch!(self, render_config(config, path))
    }
}
