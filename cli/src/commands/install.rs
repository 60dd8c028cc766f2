//! `dem install`, `dem uninstall` and `dem pull`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::CollectionStore;
use crate::application::services::{AvailabilityIndex, CatalogSet, Platform};
use crate::domain::DevEnvError;

/// A single Development Environment name.
#[derive(Args)]
pub struct NameArgs {
    /// Development Environment name
    pub name: String,
}

/// Install a local DevEnv, pulling missing tool images.
///
/// # Errors
///
/// Returns an error if a pull fails or tools remain unavailable.
pub async fn install(app: &AppContext, args: NameArgs) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    install_loaded(app, &mut platform, &args.name).await
}

async fn install_loaded(
    app: &AppContext,
    platform: &mut Platform<impl CollectionStore>,
    name: &str,
) -> Result<ExitCode> {
    let engine = app.engine();
    let registries = app.registries(platform.collection())?;
    let reporter = app.reporter();

    let mut index = AvailabilityIndex::new(&engine, &registries);
    let report = platform.install(name, &mut index, &reporter).await?;
    drop(reporter);

    app.renderer().install(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Uninstall a DevEnv, removing images no other DevEnv declares.
///
/// # Errors
///
/// Returns an error if the DevEnv is not installed or an image removal fails.
pub async fn uninstall(app: &AppContext, args: NameArgs) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    let engine = app.engine();
    let reporter = app.reporter();

    let report = platform.uninstall(&args.name, &engine, &reporter).await?;
    drop(reporter);

    app.renderer().uninstall(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Clone a catalog definition and install it.
///
/// # Errors
///
/// Returns an error if no catalog has the DevEnv, a local one of that name
/// exists, or the install fails.
pub async fn pull(app: &AppContext, args: NameArgs) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    let fetcher = app.catalog_fetcher()?;
    let env = {
        let reporter = app.reporter();
        let mut set = CatalogSet::new(platform.collection().catalogs());
        set.get_dev_env_by_name(&args.name, &fetcher, &reporter)
            .await
            .ok_or_else(|| DevEnvError::NotFound(args.name.clone()))?
    };
    platform.import(env, false).await?;
    install_loaded(app, &mut platform, &args.name).await
}
