//! Human-readable and JSON rendering of runs.
//!
//! The engine returns raw moments; everything printed by the CLI is
//! formatted here.

use std::fmt::Write as _;
use std::time::Duration;

use mc_engine::mc::{Parameters, RunReport, SharedResult, StopReason, WorkerSummary};
use mc_engine::rng::SeedSource;
use serde::Serialize;

use crate::config::TrialKind;

/// Parameter block printed before a run
pub fn format_params(params: &Parameters, trial: TrialKind, seed_source: SeedSource) -> String {
    let seeds = match seed_source {
        SeedSource::Entropy => "entropy".to_string(),
        SeedSource::Fixed(base) => format!("fixed ({})", base),
    };

    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "--- Run input parameters:");
    let _ = writeln!(out, "rtol:      {:e}", params.rtol());
    let _ = writeln!(out, "maxtrials: {}", params.max_trials());
    let _ = writeln!(out, "nbatch:    {}", params.batch_size());
    let _ = writeln!(out, "workers:   {}", params.workers());
    let _ = writeln!(out, "trial:     {}", trial.name());
    let _ = writeln!(out, "seeds:     {}", seeds);
    out
}

/// `<mean> (<std error>) from <n> trials`
pub fn format_result(result: &SharedResult) -> String {
    format!(
        "{} ({}) from {} trials",
        result.mean(),
        result.std_error(),
        result.count()
    )
}

/// Stop reason, batch count and wall-clock time
pub fn format_summary(report: &RunReport, elapsed: Option<Duration>) -> String {
    let mut line = format!(
        "Stopped: {} after {} batches",
        report.stop_reason, report.batches_merged
    );
    if let Some(elapsed) = elapsed {
        let _ = write!(line, " in {:.3} s", elapsed.as_secs_f64());
    }
    line
}

/// JSON document for `--format json`
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Run parameters
    pub parameters: &'a Parameters,
    /// Quantity estimated
    pub trial: TrialKind,
    /// Estimated expectation
    pub mean: f64,
    /// Standard error of the mean
    pub std_error: f64,
    /// Trials merged
    pub trials: u64,
    /// Why the run stopped
    pub stop_reason: StopReason,
    /// Batches merged
    pub batches_merged: u64,
    /// Wall-clock duration in seconds
    pub elapsed_seconds: Option<f64>,
    /// Per-worker accounting
    pub workers: &'a [WorkerSummary],
}

impl<'a> JsonReport<'a> {
    /// Assemble the document from a finished run
    pub fn new(
        parameters: &'a Parameters,
        trial: TrialKind,
        report: &'a RunReport,
        elapsed: Option<Duration>,
    ) -> Self {
        Self {
            parameters,
            trial,
            mean: report.result.mean(),
            std_error: report.result.std_error(),
            trials: report.result.count(),
            stop_reason: report.stop_reason,
            batches_merged: report.batches_merged,
            elapsed_seconds: elapsed.map(|d| d.as_secs_f64()),
            workers: &report.workers,
        }
    }
}
