//! `dem run`: run a command in one tool of a DevEnv.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use dem_common::ToolType;

use crate::app::AppContext;
use crate::application::ports::{ContainerEngine, ProgressReporter};
use crate::application::services::AvailabilityIndex;
use crate::domain::{DevEnvError, DevEnvState};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Development Environment to use (default: the default one)
    #[arg(long, short = 'd')]
    pub dev_env: Option<String>,

    /// Tool whose image runs the command
    #[arg(value_name = "TOOL_TYPE")]
    pub tool_type: ToolType,

    /// Command to run inside the tool image
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

/// Health-check the DevEnv, offer a confirmed install when it is not
/// installed or tool images are missing, then run the command with the working directory mounted.
///
/// # Errors
///
/// Returns an error if no DevEnv resolves, the repair is declined or fails,
/// the DevEnv has no such tool, or the engine cannot start the container.
pub async fn run(app: &AppContext, args: RunArgs) -> Result<ExitCode> {
    let mut platform = app.platform().await?;
    let name = platform.resolve(args.dev_env.as_deref())?.name.clone();
    let engine = app.engine();
    let registries = app.registries(platform.collection())?;

    {
        let reporter = app.reporter();
        let mut index = AvailabilityIndex::new(&engine, &registries);
        let health = platform.health_check(&name, &mut index, &reporter).await?;
        if health.needs_repair() {
            let missing = health
                .classification
                .missing()
                .map(|t| t.tool.image.reference())
                .collect::<Vec<_>>()
                .join(", ");
            let detail = if missing.is_empty() {
                String::new()
            } else {
                format!("; missing locally: {missing}")
            };
            reporter.warn(&format!(
                "Development Environment '{name}' is {}{detail}",
                health.state.label()
            ));
            if !app.confirm("Install it now?", false)? {
                return Err(match health.state {
                    DevEnvState::Uninstalled => DevEnvError::NotInstalled(name),
                    DevEnvState::Stale | DevEnvState::Installed => {
                        DevEnvError::InstallIncomplete { name, missing }
                    }
                }
                .into());
            }
            platform.install(&name, &mut index, &reporter).await?;
        }
    }

    let env = platform.collection().require(&name)?;
    let tool = env.tool(args.tool_type).ok_or_else(|| {
        DevEnvError::InvalidTool(format!("'{name}' has no {} tool", args.tool_type))
    })?;
    let workdir = std::env::current_dir().context("cannot determine working directory")?;

    let code = engine.run(&tool.image, &workdir, &args.command).await?;
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
