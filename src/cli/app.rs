//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::output::{Output, OutputFormat};
use super::{bind_cmd, resolve, scan};
use crate::config::Config;
use crate::plugin::ModuleLoader;

#[derive(Parser)]
#[command(name = "plugwire")]
#[command(author, version, about = "Discover plugin modules and bind their contracts")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to a config file
    #[arg(long, short = 'c', global = true, env = "PLUGWIRE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fail when two types claim the same contract
    #[arg(long, global = true)]
    pub deny_conflicts: bool,

    /// Process modules in directory order instead of sorting by name
    #[arg(long, global = true)]
    pub no_sort: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load every module in a directory and list the types found
    Scan {
        /// Plugin directory
        dir: PathBuf,
    },

    /// Show which type each contract binds to
    Bind {
        /// Plugin directory
        dir: PathBuf,
    },

    /// Register all modules and construct an implementation of a contract
    Resolve {
        /// Plugin directory
        dir: PathBuf,

        /// Contract to resolve
        contract: String,
    },
}

impl Cli {
    /// Loads config and applies command-line overrides
    fn effective_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if self.deny_conflicts {
            config.binding.deny_conflicts = true;
        }
        if self.no_sort {
            config.discovery.sort = false;
        }
        Ok(config)
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = Output::new(cli.format);
    let config = cli.effective_config()?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Scan { dir } => scan::run(&output, &dir, &config)?,
        Commands::Bind { dir } => bind_cmd::run(&output, &dir, &config)?,
        Commands::Resolve { dir, contract } => resolve::run(&output, &dir, &contract, config)?,
    }

    debug!("command completed successfully");
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Loader used for module files on disk
#[cfg(feature = "dynamic-loading")]
pub(super) fn module_loader() -> Box<dyn ModuleLoader> {
    Box::new(crate::plugin::NativeModuleLoader::new())
}

/// Without dynamic loading no file on disk is a module
#[cfg(not(feature = "dynamic-loading"))]
pub(super) fn module_loader() -> Box<dyn ModuleLoader> {
    Box::new(crate::plugin::StaticModuleLoader::new())
}
