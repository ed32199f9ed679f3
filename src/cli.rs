// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "funcship")]
#[command(about = "Provision and publish serverless function apps, idempotently")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only the final result line
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to find the configuration and which destination to use.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to the config file (default: discover in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Target destination (defined in config)
    #[arg(short, long)]
    pub destination: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new funcship.yml configuration file
    Init {
        /// Function app name to put in the template
        #[arg(long)]
        app: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Provision resources, upload artifacts and publish the app
    Deploy {
        #[command(flatten)]
        config: ConfigArgs,

        /// Print the plan without contacting the cloud provider
        #[arg(long)]
        dry_run: bool,
    },

    /// Show what a deployment would do (same as deploy --dry-run)
    Plan {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Load and validate the configuration only
    Validate {
        #[command(flatten)]
        config: ConfigArgs,
    },
}
