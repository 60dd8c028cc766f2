//! `dem config`: show and set configuration values.

use anyhow::Result;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;

use clap::Subcommand;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error on an unknown key, an invalid value, or a write failure.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => {
            let path = app.config_store.path()?;
            app.renderer().config(&app.config, &path)?;
        }
        ConfigCommand::Set { key, value } => {
            let mut config = app.config.clone();
            config.set(&key, &value)?;
            app.config_store.save(&config)?;
            let shown = config.get(&key).unwrap_or(value);
            app.renderer().done(&format!("Set {key} = {shown}"))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
