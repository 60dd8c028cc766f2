//! `dem catalog`: catalog configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;
use dem_common::CatalogDescriptor;

use crate::app::AppContext;

/// Catalog subcommands.
#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Add a catalog
    Add {
        /// Unique catalog name
        name: String,
        /// URL of the catalog document
        url: String,
    },
    /// List configured catalogs
    List,
    /// Remove a catalog
    #[command(alias = "rm")]
    Del {
        /// Catalog name
        name: String,
    },
}

/// Run the catalog command. Only configuration is touched; no catalog is
/// fetched.
///
/// # Errors
///
/// Returns an error on a duplicate or unknown name, or a save failure.
pub async fn run(app: &AppContext, cmd: CatalogCommand) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    match cmd {
        CatalogCommand::Add { name, url } => {
            platform
                .add_catalog(CatalogDescriptor {
                    name: name.clone(),
                    url,
                })
                .await?;
            app.renderer().done(&format!("Added catalog '{name}'"))?;
        }
        CatalogCommand::List => app.renderer().catalogs(platform.collection().catalogs())?,
        CatalogCommand::Del { name } => {
            platform.remove_catalog(&name).await?;
            app.renderer().done(&format!("Removed catalog '{name}'"))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
