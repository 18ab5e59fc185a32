//! threaded-mc - adaptive parallel Monte Carlo estimation
//!
//! Command-line front end for the `mc_engine` crate.
//!
//! # Commands
//!
//! - `threaded-mc [OPTIONS]` - Run an estimation until it converges or the
//!   trial budget is spent
//! - `threaded-mc check [OPTIONS]` - Resolve and validate the configuration
//!   without running
//!
//! Options are layered: built-in defaults, then the TOML file given with
//! `--config`, then `THREADED_MC_*` environment variables, then flags.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod clock;
mod commands;
mod config;
mod error;
mod report;

pub use error::{CliError, Result};

use config::{OutputFormat, RunConfig, TrialKind};

/// Adaptive parallel Monte Carlo estimator
#[derive(Parser)]
#[command(name = "threaded-mc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an estimation (the default)
    Run,

    /// Validate the resolved configuration without running
    Check,
}

/// Estimation options shared by every command
#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Worker threads
    #[arg(short = 'p', long, global = true)]
    workers: Option<usize>,

    /// Relative tolerance on the standard error
    #[arg(short = 't', long, global = true)]
    rtol: Option<f64>,

    /// Maximum number of trials
    #[arg(short = 'n', long, global = true)]
    max_trials: Option<u64>,

    /// Trials per batch
    #[arg(short = 'b', long, global = true)]
    batch_size: Option<usize>,

    /// Verbosity level (0 = result only)
    #[arg(short = 'v', long = "verbose", value_name = "LEVEL", global = true)]
    verbosity: Option<u8>,

    /// Master seed for a reproducible run
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Quantity to estimate
    #[arg(long, value_enum, global = true)]
    trial: Option<TrialKind>,

    /// Output format
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,
}

impl From<&RunArgs> for RunConfig {
    fn from(args: &RunArgs) -> Self {
        Self {
            rtol: args.rtol,
            max_trials: args.max_trials,
            batch_size: args.batch_size,
            workers: args.workers,
            verbosity: args.verbosity,
            seed: args.seed,
            trial: args.trial,
            format: args.format,
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<RunConfig> {
    let file = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    Ok(file
        .with_env_override()?
        .layer(RunConfig::from(&cli.run)))
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbosity: u8) {
    // RUST_LOG wins over the verbosity level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli).context("failed to resolve configuration")?;

    init_tracing(config.verbosity());
    debug!(?config, "Resolved configuration");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::run(&config)?,
        Commands::Check => commands::check::run(&config)?,
    }

    Ok(())
}
