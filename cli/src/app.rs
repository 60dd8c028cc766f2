//! Application context: unified state passed to every command handler.
//!
//! `AppContext` owns the output settings, the loaded configuration and the
//! factories for every infrastructure adapter, so command signatures stay
//! `(&AppContext, args)`.

use anyhow::Result;
use reqwest::Client;

use crate::application::ports::ConfigStore;
use crate::application::services::Platform;
use crate::domain::{DemConfig, DevEnvCollection};
use crate::infra::catalog::HttpCatalogFetcher;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::docker::DockerEngine;
use crate::infra::http;
use crate::infra::registry::RegistryBackend;
use crate::infra::store::JsonCollectionStore;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `DEM_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// User configuration loaded at startup.
    pub config: DemConfig,
    /// Where the configuration is read from and written to.
    pub config_store: YamlConfigStore,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `DEM_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var_os("CI").is_some() || std::env::var_os("DEM_YES").is_some();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config_store = YamlConfigStore;
        let config = config_store.load()?;

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config,
            config_store,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Progress reporter for services; writes to stderr in JSON mode.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output, self.is_json())
    }

    /// Load the persisted DevEnv collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is unreadable, corrupt, or of an
    /// unsupported version.
    pub async fn platform(&self) -> Result<Platform<JsonCollectionStore>> {
        Platform::load(JsonCollectionStore::new()?).await
    }

    /// Container engine configured from `engine.*` settings.
    #[must_use]
    pub fn engine(&self) -> DockerEngine<TokioCommandRunner> {
        DockerEngine::from_config(&self.config)
    }

    fn http_client(&self) -> Result<Client> {
        http::client(self.config.http_timeout())
    }

    /// One client per registry configured in `collection`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn registries(&self, collection: &DevEnvCollection) -> Result<Vec<RegistryBackend>> {
        let client = self.http_client()?;
        Ok(RegistryBackend::all(
            collection.registries(),
            &self.config,
            &client,
        ))
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn catalog_fetcher(&self) -> Result<HttpCatalogFetcher> {
        Ok(HttpCatalogFetcher::new(self.http_client()?))
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `DEM_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
