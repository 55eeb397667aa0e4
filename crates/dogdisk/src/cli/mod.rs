//! dogdisk cli definition and entrypoint.
mod clean;
mod run;
mod urls;
pub mod ux;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dogdisk_core::config::{Config, ConfigError, get_config, validate_breed};
use dogdisk_core::disk::DiskClient;

use crate::log::setup_logging;

/// dogdisk - upload dog pictures to Yandex Disk and check they arrived.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Yandex Disk OAuth token, overrides the config and YANDEX_DISK_TOKEN.
    #[arg(long, global = true)]
    token: Option<String>,

    /// Path to the config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Show verbose logs.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload pictures for each breed, check the folder and remove it.
    Run {
        /// Breed to run, may be repeated. Defaults to the configured breeds.
        #[arg(short, long = "breed", value_parser = parse_breed)]
        breeds: Vec<String>,
    },
    /// Show the sub-breeds and picture urls a breed resolves to.
    Urls {
        /// Breed to look up.
        #[arg(value_parser = parse_breed)]
        breed: String,
    },
    /// Remove scenario folders left on the disk.
    Clean {
        /// Breed whose folder to remove, may be repeated. Defaults to the configured breeds.
        #[arg(short, long = "breed", value_parser = parse_breed)]
        breeds: Vec<String>,
    },
}

/// Runs the cli. Returns `false` when a command completed but reported failures.
pub async fn run() -> Result<bool> {
    let cli = Cli::parse();

    if cli.verbose {
        setup_logging().context("Failed to set up logging")?;
    }

    let config = get_config(cli.config.clone()).context("Failed to load configuration")?;

    match &cli.command {
        Commands::Run { breeds } => {
            let client = disk_client(&config, cli.token.as_deref())?;
            run::execute(&config, &client, selected_breeds(breeds, &config)).await
        }
        Commands::Urls { breed } => urls::execute(&config, breed).await.map(|_| true),
        Commands::Clean { breeds } => {
            let client = disk_client(&config, cli.token.as_deref())?;
            clean::execute(&config, &client, selected_breeds(breeds, &config)).await
        }
    }
}

fn disk_client(config: &Config, token: Option<&str>) -> Result<DiskClient> {
    DiskClient::new(&config.disk, token).context("Failed to create Yandex Disk client")
}

fn parse_breed(breed: &str) -> Result<String, ConfigError> {
    validate_breed(breed)?;
    Ok(breed.to_string())
}

fn selected_breeds(requested: &[String], config: &Config) -> Vec<String> {
    if requested.is_empty() {
        config.scenario.breeds.clone()
    } else {
        requested.to_vec()
    }
}
