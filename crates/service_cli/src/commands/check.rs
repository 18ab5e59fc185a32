//! Check command implementation
//!
//! Resolves and validates the configuration without running any trial.

use mc_engine::mc::{default_workers, MAX_WORKERS};
use tracing::info;

use crate::config::RunConfig;
use crate::report::format_params;
use crate::Result;

/// Run the check command
pub fn run(config: &RunConfig) -> Result<()> {
    info!("Checking configuration...");

    let params = config.parameters()?;

    print!("{}", format_params(&params, config.trial(), config.seed_source()));
    println!("--- System:");
    println!("default workers: {}", default_workers());
    println!("worker cap:      {}", MAX_WORKERS);
    println!("Configuration OK");

    Ok(())
}
