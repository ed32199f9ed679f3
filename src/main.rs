// ABOUTME: Entry point for the funcship CLI application.
// ABOUTME: Parses arguments, sets up logging and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, ConfigArgs};
use funcship::config::{self, DeploymentConfig};
use funcship::error::Result;
use funcship::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("funcship=debug")
        } else {
            EnvFilter::new("funcship=info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli.command, Output::new(mode)).await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(command: Commands, output: Output) -> Result<()> {
    match command {
        Commands::Init { app, force } => {
            let cwd = env::current_dir()?;
            let path = config::init_config(&cwd, app.as_deref(), force)?;
            output.success(&format!("Created {}", path.display()));
            Ok(())
        }
        Commands::Deploy { config, dry_run } => {
            let config = load(&config)?;
            if dry_run {
                commands::plan(config, output)
            } else {
                commands::deploy(config, output).await
            }
        }
        Commands::Plan { config } => commands::plan(load(&config)?, output),
        Commands::Validate { config } => commands::validate(load(&config)?, output),
    }
}

fn load(args: &ConfigArgs) -> Result<DeploymentConfig> {
    let cwd = env::current_dir()?;
    DeploymentConfig::load(args.config.as_deref(), &cwd, args.destination.as_deref())
}
