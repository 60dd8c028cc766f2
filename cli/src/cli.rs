//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::commands::install::NameArgs;

/// Manage containerized Development Environments
#[derive(Parser)]
#[command(
    name = "dem",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Answer every confirmation with its default
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List local Development Environments, or catalog ones with --catalog
    List(commands::list::ListArgs),

    /// Show tools and their availability
    Info(commands::info::InfoArgs),

    /// Pull missing tool images and mark as installed
    Install(NameArgs),

    /// Remove tool images no other Development Environment needs
    Uninstall(NameArgs),

    /// Clone from a catalog and install
    Pull(NameArgs),

    /// Copy a catalog definition into the local collection
    Clone(commands::dev_env::CloneArgs),

    /// Create a Development Environment from explicit tools
    Create(commands::dev_env::CreateArgs),

    /// Change the tools of a Development Environment
    Modify(commands::dev_env::ModifyArgs),

    /// Delete a Development Environment
    Delete(NameArgs),

    /// Rename an uninstalled Development Environment
    Rename(commands::dev_env::RenameArgs),

    /// Copy a Development Environment under a new name
    Cp(commands::dev_env::RenameArgs),

    /// Write a Development Environment to a descriptor file
    Export(commands::dev_env::ExportArgs),

    /// Add Development Environments from a descriptor file
    Load(commands::dev_env::LoadArgs),

    /// Choose the Development Environment used when none is given
    SetDefault(commands::dev_env::SetDefaultArgs),

    /// Run a command in a tool of a Development Environment
    Run(commands::run::RunArgs),

    /// List every known tool image with its availability
    ListTools,

    /// Manage registries
    #[command(subcommand)]
    Registry(commands::registry::RegistryCommand),

    /// Manage catalogs
    #[command(subcommand)]
    Catalog(commands::catalog::CatalogCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        })?;

        match command {
            Command::List(args) => commands::list::run(&app, args).await,
            Command::Info(args) => commands::info::run(&app, args).await,
            Command::Install(args) => commands::install::install(&app, args).await,
            Command::Uninstall(args) => commands::install::uninstall(&app, args).await,
            Command::Pull(args) => commands::install::pull(&app, args).await,
            Command::Clone(args) => commands::dev_env::clone(&app, args).await,
            Command::Create(args) => commands::dev_env::create(&app, args).await,
            Command::Modify(args) => commands::dev_env::modify(&app, args).await,
            Command::Delete(args) => commands::dev_env::delete(&app, args).await,
            Command::Rename(args) => commands::dev_env::rename(&app, args).await,
            Command::Cp(args) => commands::dev_env::copy(&app, args).await,
            Command::Export(args) => commands::dev_env::export(&app, args).await,
            Command::Load(args) => commands::dev_env::load(&app, args).await,
            Command::SetDefault(args) => commands::dev_env::set_default(&app, args).await,
            Command::Run(args) => commands::run::run(&app, args).await,
            Command::ListTools => commands::list::list_tools(&app).await,
            Command::Registry(cmd) => commands::registry::run(&app, cmd).await,
            Command::Catalog(cmd) => commands::catalog::run(&app, cmd).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
        }
    }
}
