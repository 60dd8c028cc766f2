//! Local DevEnv management: create, modify, delete, rename, copy, default,
//! clone from a catalog, export and load.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use dem_common::ToolType;

use crate::app::AppContext;
use crate::application::ports::CollectionStore;
use crate::application::services::{CatalogSet, Platform};
use crate::domain::{DevEnv, DevEnvError, Tool};
use crate::infra::store::{read_definitions, write_definition};

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Name of the new Development Environment
    pub name: String,

    /// Tool as TYPE=IMAGE:TAG; repeat for several tools
    #[arg(long = "tool", value_name = "TYPE=IMAGE:TAG", required = true)]
    pub tools: Vec<String>,
}

/// Arguments for the modify command.
#[derive(Args)]
pub struct ModifyArgs {
    /// Development Environment name
    pub name: String,

    /// Tool to set as TYPE=IMAGE:TAG, replacing any tool of that type
    #[arg(long = "tool", value_name = "TYPE=IMAGE:TAG")]
    pub tools: Vec<String>,

    /// Tool type to drop
    #[arg(long = "remove-tool", value_name = "TYPE")]
    pub remove: Vec<ToolType>,
}

/// Arguments taking a source and a destination name.
#[derive(Args)]
pub struct RenameArgs {
    /// Existing Development Environment
    pub from: String,
    /// New name
    pub to: String,
}

/// Arguments for the set-default command.
#[derive(Args)]
pub struct SetDefaultArgs {
    /// Development Environment to use when none is given
    #[arg(required_unless_present = "clear")]
    pub name: Option<String>,

    /// Clear the default instead
    #[arg(long, conflicts_with = "name")]
    pub clear: bool,
}

/// Arguments for the clone command.
#[derive(Args)]
pub struct CloneArgs {
    /// Name of the catalog definition
    pub name: String,

    /// Replace a local, uninstalled DevEnv of the same name
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Development Environment name
    pub name: String,
    /// Destination file
    pub path: PathBuf,
}

/// Arguments for the load command.
#[derive(Args)]
pub struct LoadArgs {
    /// Descriptor file written by `dem export` or a catalog document
    pub path: PathBuf,
}

fn parse_tools(selections: &[String]) -> Result<Vec<Tool>, DevEnvError> {
    selections.iter().map(|s| Tool::parse_selection(s)).collect()
}

/// Offer to uninstall an installed DevEnv before a structural edit.
///
/// Declining, or running non-interactively, keeps it installed and fails
/// with `DevEnvError::Installed`.
async fn uninstall_if_confirmed(
    app: &AppContext,
    platform: &mut Platform<impl CollectionStore>,
    name: &str,
) -> Result<()> {
    if !platform.collection().require(name)?.installed {
        return Ok(());
    }
    let prompt = format!("Development Environment '{name}' is installed. Uninstall it first?");
    if !app.confirm(&prompt, false)? {
        return Err(DevEnvError::Installed(name.to_string()).into());
    }
    let engine = app.engine();
    let reporter = app.reporter();
    platform.uninstall(name, &engine, &reporter).await?;
    Ok(())
}

/// # Errors
///
/// Returns an error on an invalid name or tool selection, or a name clash.
pub async fn create(app: &AppContext, args: CreateArgs) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    let env = DevEnv::new(&args.name, parse_tools(&args.tools)?)?;
    platform.create(env).await?;
    app.renderer()
        .done(&format!("Created Development Environment '{}'", args.name))?;
    Ok(ExitCode::SUCCESS)
}

/// # Errors
///
/// Returns an error on an invalid tool selection or when the DevEnv stays
/// installed.
pub async fn modify(app: &AppContext, args: ModifyArgs) -> Result<ExitCode> {
    let tools = parse_tools(&args.tools)?;
    if tools.is_empty() && args.remove.is_empty() {
        anyhow::bail!("Nothing to change. Pass --tool TYPE=IMAGE:TAG or --remove-tool TYPE");
    }
    let mut platform = app.platform().await?;
    uninstall_if_confirmed(app, &mut platform, &args.name).await?;
    platform.modify(&args.name, tools, &args.remove).await?;
    app.renderer()
        .done(&format!("Modified Development Environment '{}'", args.name))?;
    Ok(ExitCode::SUCCESS)
}

/// # Errors
///
/// Returns an error if the DevEnv is unknown or stays installed.
pub async fn delete(app: &AppContext, args: super::install::NameArgs) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    uninstall_if_confirmed(app, &mut platform, &args.name).await?;
    platform.delete(&args.name).await?;
    app.renderer()
        .done(&format!("Deleted Development Environment '{}'", args.name))?;
    Ok(ExitCode::SUCCESS)
}

/// # Errors
///
/// Returns an error if the DevEnv is installed, unknown, or the new name is
/// invalid or taken.
pub async fn rename(app: &AppContext, args: RenameArgs) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    platform.rename(&args.from, &args.to).await?;
    app.renderer()
        .done(&format!("Renamed '{}' to '{}'", args.from, args.to))?;
    Ok(ExitCode::SUCCESS)
}

/// # Errors
///
/// Returns an error if the source is unknown or the new name is invalid or
/// taken.
pub async fn copy(app: &AppContext, args: RenameArgs) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    platform.copy(&args.from, &args.to).await?;
    app.renderer()
        .done(&format!("Copied '{}' to '{}'", args.from, args.to))?;
    Ok(ExitCode::SUCCESS)
}

/// # Errors
///
/// Returns an error if the DevEnv is unknown.
pub async fn set_default(app: &AppContext, args: SetDefaultArgs) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    let name = if args.clear { None } else { args.name.as_deref() };
    platform.set_default(name).await?;
    let message = match name {
        Some(name) => format!("'{name}' is now the default Development Environment"),
        None => "Cleared the default Development Environment".to_string(),
    };
    app.renderer().done(&message)?;
    Ok(ExitCode::SUCCESS)
}

/// Copy a catalog definition into the local collection, uninstalled.
///
/// # Errors
///
/// Returns an error if no catalog has it or a local DevEnv blocks it.
pub async fn clone(app: &AppContext, args: CloneArgs) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    let fetcher = app.catalog_fetcher()?;
    let env = {
        let reporter = app.reporter();
        let mut set = CatalogSet::new(platform.collection().catalogs());
        set.get_dev_env_by_name(&args.name, &fetcher, &reporter)
            .await
            .ok_or_else(|| DevEnvError::NotFound(args.name.clone()))?
    };
    platform.import(env, args.force).await?;
    app.renderer()
        .done(&format!("Cloned Development Environment '{}'", args.name))?;
    Ok(ExitCode::SUCCESS)
}

/// # Errors
///
/// Returns an error if the DevEnv is unknown or the file cannot be written.
pub async fn export(app: &AppContext, args: ExportArgs) -> Result<ExitCode> {
    let platform = app.platform().await?;
    let env = platform.collection().require(&args.name)?;
    write_definition(&args.path, env.to_descriptor())?;
    app.renderer().done(&format!(
        "Exported '{}' to {}",
        args.name,
        args.path.display()
    ))?;
    Ok(ExitCode::SUCCESS)
}

/// Add every definition in a descriptor file, uninstalled.
///
/// # Errors
///
/// Returns an error if the file is unreadable or a definition is invalid or
/// clashes with a local DevEnv. Nothing is added unless every definition is.
pub async fn load(app: &AppContext, args: LoadArgs) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    let definitions = read_definitions(&args.path)?;
    if definitions.is_empty() {
        anyhow::bail!("{} holds no Development Environment", args.path.display());
    }
    let envs = definitions
        .iter()
        .map(DevEnv::from_definition)
        .collect::<Result<Vec<_>, _>>()?;
    let names = envs.iter().map(|e| e.name.clone()).collect::<Vec<_>>();
    platform.import_all(envs).await?;
    app.renderer()
        .done(&format!("Loaded {}", names.join(", ")))?;
    Ok(ExitCode::SUCCESS)
}
