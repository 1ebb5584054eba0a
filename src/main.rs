//! Stratus CLI - manage deployment records for OpenStack benchmarking runs
//!
//! A deployment record describes how to reach and authenticate against
//! one target cloud. Stratus keeps those records under `~/.stratus`,
//! tracks which one is active, and regenerates shell-sourceable
//! credential export files whenever the active deployment changes.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod deps;
mod envstate;
mod errors;
mod model;
mod store;
mod ui;
mod verify;

#[cfg(test)]
mod test_helpers;

#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "Manage deployment records for OpenStack benchmarking runs")]
#[command(version)]
#[command(author)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Manage deployment records
    Deployment {
        #[command(subcommand)]
        command: DeploymentCommand,
    },
}

#[derive(Subcommand)]
enum DeploymentCommand {
    /// Create a deployment record
    Create {
        /// Name of the deployment
        #[arg(long)]
        name: String,

        /// Path to a JSON config document; omit to build the config from
        /// the OS_* environment variables
        #[arg(long)]
        filename: Option<PathBuf>,

        /// Switch to the new deployment once created
        #[arg(long = "use")]
        do_use: bool,
    },

    /// Re-run the deployment workflow against the stored config
    Recreate {
        /// Deployment uuid or name (defaults to the active deployment)
        #[arg(long)]
        deployment: Option<String>,
    },

    /// Destroy a deployment record
    Destroy {
        /// Deployment uuid or name (defaults to the active deployment)
        #[arg(long)]
        deployment: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List deployment records
    List,

    /// Show a deployment's admin credentials (password masked)
    Show {
        /// Deployment uuid or name (defaults to the active deployment)
        #[arg(long)]
        deployment: Option<String>,
    },

    /// Print a deployment's stored configuration as JSON
    Config {
        /// Deployment uuid or name (defaults to the active deployment)
        #[arg(long)]
        deployment: Option<String>,
    },

    /// Make a deployment the active one
    Use {
        /// Deployment uuid or name
        deployment: String,
    },

    /// Verify that a deployment's endpoints are reachable
    Check {
        /// Deployment uuid or name (defaults to the active deployment)
        #[arg(long)]
        deployment: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("error"),
        1 => EnvFilter::new("warn"),
        2 => EnvFilter::new("info"),
        3 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let Command::Deployment { command } = cli.command;
    match command {
        DeploymentCommand::Create {
            name,
            filename,
            do_use,
        } => commands::create::execute(commands::create::CreateArgs {
            name,
            filename,
            do_use,
        }),
        DeploymentCommand::Recreate { deployment } => {
            commands::recreate::execute(commands::recreate::RecreateArgs { deployment })
        }
        DeploymentCommand::Destroy { deployment, force } => {
            commands::destroy::execute(commands::destroy::DestroyArgs { deployment, force })
        }
        DeploymentCommand::List => commands::list::execute(),
        DeploymentCommand::Show { deployment } => {
            commands::show::execute(commands::show::ShowArgs { deployment })
        }
        DeploymentCommand::Config { deployment } => {
            commands::config::execute(commands::config::ConfigArgs { deployment })
        }
        DeploymentCommand::Use { deployment } => {
            let code = commands::activate::execute(commands::activate::ActivateArgs { deployment })?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        DeploymentCommand::Check { deployment } => {
            let code =
                commands::check::execute(commands::check::CheckArgs { deployment }).await?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
    }
}
