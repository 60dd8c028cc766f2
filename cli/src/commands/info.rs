//! `dem info`: tool table with live availability.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::{AvailabilityIndex, CatalogSet, Refresh, Scope};
use crate::domain::DevEnvError;

/// Arguments for the info command.
#[derive(Args)]
pub struct InfoArgs {
    /// Development Environment name
    pub name: String,

    /// Look the name up in the configured catalogs instead
    #[arg(long)]
    pub catalog: bool,
}

/// Run `dem info`.
///
/// # Errors
///
/// Returns an error if the DevEnv is unknown or the local engine cannot list
/// its images.
pub async fn run(app: &AppContext, args: InfoArgs) -> Result<ExitCode> {
    let platform = app.platform().await?;
    let engine = app.engine();
    let registries = app.registries(platform.collection())?;
    let reporter = app.reporter();

    let (env, local) = if args.catalog {
        let fetcher = app.catalog_fetcher()?;
        let mut set = CatalogSet::new(platform.collection().catalogs());
        let env = set
            .get_dev_env_by_name(&args.name, &fetcher, &reporter)
            .await
            .ok_or_else(|| DevEnvError::NotFound(args.name.clone()))?;
        (env, false)
    } else {
        (platform.collection().require(&args.name)?.clone(), true)
    };

    let mut index = AvailabilityIndex::new(&engine, &registries);
    let classification = index
        .classify(env.tools(), Scope::Full, Refresh::All, &reporter)
        .await?;
    drop(reporter);

    let state = local.then(|| env.state(&classification));
    app.renderer().dev_env_info(&env, state, &classification)?;
    Ok(ExitCode::SUCCESS)
}
