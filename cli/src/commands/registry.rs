//! `dem registry`: registry configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;
use dem_common::{RegistryDescriptor, RegistryKind};

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::list_registry_repos;

/// Registry subcommands.
#[derive(Subcommand)]
pub enum RegistryCommand {
    /// Add a registry
    Add {
        /// Unique registry name
        name: String,
        /// Hub organization namespace, or http(s)://host[:port] of a V2 registry
        url: String,
        /// Protocol; inferred from the URL when omitted
        #[arg(long, value_enum)]
        kind: Option<RegistryKind>,
    },
    /// List registries with the number of images each supplies
    List,
    /// Remove a registry
    #[command(alias = "rm")]
    Del {
        /// Registry name
        name: String,
    },
}

/// Run the registry command.
///
/// # Errors
///
/// Returns an error on a duplicate or unknown name, or a save failure.
pub async fn run(app: &AppContext, cmd: RegistryCommand) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    match cmd {
        RegistryCommand::Add { name, url, kind } => {
            platform
                .add_registry(RegistryDescriptor {
                    name: name.clone(),
                    url,
                    kind,
                })
                .await?;
            app.renderer().done(&format!("Added registry '{name}'"))?;
        }
        RegistryCommand::List => {
            let registries = app.registries(platform.collection())?;
            let mut counts = Vec::with_capacity(registries.len());
            {
                let reporter = app.reporter();
                for registry in &registries {
                    match list_registry_repos(registry, &reporter).await {
                        Ok(images) => counts.push(Some(images.len())),
                        Err(e) => {
                            reporter.warn(&format!("Skipping registry: {e}"));
                            counts.push(None);
                        }
                    }
                }
            }
            let rows: Vec<_> = platform
                .collection()
                .registries()
                .iter()
                .zip(counts)
                .collect();
            app.renderer().registries(&rows)?;
        }
        RegistryCommand::Del { name } => {
            platform.remove_registry(&name).await?;
            app.renderer().done(&format!("Removed registry '{name}'"))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
