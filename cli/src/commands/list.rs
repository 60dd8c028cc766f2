//! `dem list`, `dem list --catalog` and `dem list-tools`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ProgressReporter;
use crate::application::services::{AvailabilityIndex, CatalogSet, Refresh, Scope};
use crate::domain::DevEnvState;
use crate::infra::registry::RegistryBackend;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// List catalog definitions instead, optionally from one catalog only
    #[arg(long, value_name = "NAME", num_args = 0..=1)]
    pub catalog: Option<Option<String>>,
}

/// Run `dem list`.
///
/// # Errors
///
/// Returns an error if the collection cannot be loaded or a named catalog
/// fails.
pub async fn run(app: &AppContext, args: ListArgs) -> Result<ExitCode> {
    match args.catalog {
        Some(name) => list_catalogs(app, name.as_deref()).await,
        None => list_local(app).await,
    }
}

async fn list_local(app: &AppContext) -> Result<ExitCode> {
    let platform = app.platform().await?;
    let reporter = app.reporter();
    let envs = platform.collection().dev_envs();

    // Only an installed DevEnv can be stale, so the engine is consulted only
    // when one exists.
    let engine = app.engine();
    let mut index = AvailabilityIndex::<_, RegistryBackend>::new(&engine, &[]);
    let mut probe = envs.iter().any(|e| e.installed);
    let mut rows = Vec::with_capacity(envs.len());
    for env in envs {
        let mut state = if env.installed {
            DevEnvState::Installed
        } else {
            DevEnvState::Uninstalled
        };
        if probe && env.installed {
            match index
                .classify(env.tools(), Scope::LocalOnly, Refresh::Reuse, &reporter)
                .await
            {
                Ok(c) => state = env.state(&c),
                Err(e) => {
                    reporter.warn(&format!("Cannot check local tool images: {e}"));
                    probe = false;
                }
            }
        }
        rows.push((env, state));
    }
    drop(reporter);

    app.renderer().dev_env_list(&rows)?;
    Ok(ExitCode::SUCCESS)
}

async fn list_catalogs(app: &AppContext, name: Option<&str>) -> Result<ExitCode> {
    let platform = app.platform().await?;
    let fetcher = app.catalog_fetcher()?;
    let reporter = app.reporter();
    let mut set = CatalogSet::new(platform.collection().catalogs());

    let catalogs = match name {
        Some(name) => vec![set.request_one(name, &fetcher).await?],
        None => set.request_all(&fetcher, &reporter).await,
    };
    app.renderer().catalog_dev_envs(&catalogs)?;
    Ok(ExitCode::SUCCESS)
}

/// Run `dem list-tools`: every image known locally or to a registry.
///
/// # Errors
///
/// Returns an error if the collection cannot be loaded or the local engine
/// cannot list its images.
pub async fn list_tools(app: &AppContext) -> Result<ExitCode> {
    let platform = app.platform().await?;
    let engine = app.engine();
    let registries = app.registries(platform.collection())?;
    let reporter = app.reporter();

    let mut index = AvailabilityIndex::new(&engine, &registries);
    let images = index.known_images(&reporter).await?;
    drop(reporter);

    app.renderer().known_images(&images)?;
    Ok(ExitCode::SUCCESS)
}
