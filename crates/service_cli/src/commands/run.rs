//! Run command implementation
//!
//! Executes one adaptive estimation and prints the result.

use std::time::Duration;

use mc_engine::mc::{
    Coordinator, GaussianSquare, Parameters, QuarterCircle, RunReport, UniformDraw,
};
use tracing::info;

use crate::clock::WallClock;
use crate::config::{OutputFormat, RunConfig, TrialKind};
use crate::report::{format_params, format_result, format_summary, JsonReport};
use crate::Result;

/// A finished estimation with everything needed to present it
#[derive(Debug)]
pub struct Estimate {
    /// Parameters the run used
    pub params: Parameters,
    /// Engine report
    pub report: RunReport,
    /// Wall-clock duration
    pub elapsed: Option<Duration>,
}

/// Resolve parameters and run the configured trial
pub fn estimate(config: &RunConfig) -> Result<Estimate> {
    let params = config.parameters()?;
    let coordinator = Coordinator::new(params.clone()).with_seed_source(config.seed_source());
    let clock = WallClock::new();

    let report = match config.trial() {
        TrialKind::Uniform => coordinator.run_with_observer(&UniformDraw, &clock)?,
        TrialKind::QuarterCircle => coordinator.run_with_observer(&QuarterCircle, &clock)?,
        TrialKind::GaussianSquare => coordinator.run_with_observer(&GaussianSquare, &clock)?,
    };

    Ok(Estimate {
        params,
        report,
        elapsed: clock.elapsed(),
    })
}

/// Run the estimation command
pub fn run(config: &RunConfig) -> Result<()> {
    let trial = config.trial();
    let format = config.format();
    info!("Starting estimation...");
    info!("  Trial: {}", trial.name());
    info!("  Output format: {:?}", format);

    // Startup validation happens before anything is printed
    let params = config.parameters()?;
    if format == OutputFormat::Text && params.verbosity() > 0 {
        print!("{}", format_params(&params, trial, config.seed_source()));
    }

    let estimate = estimate(config)?;

    match format {
        OutputFormat::Text => {
            println!("{}", format_result(&estimate.report.result));
            if estimate.params.verbosity() > 0 {
                println!("{}", format_summary(&estimate.report, estimate.elapsed));
            }
        }
        OutputFormat::Json => {
            let document =
                JsonReport::new(&estimate.params, trial, &estimate.report, estimate.elapsed);
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    info!("Estimation complete");
    Ok(())
}
