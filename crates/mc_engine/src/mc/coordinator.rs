//! Worker orchestration.
//!
//! The [`Coordinator`] draws one seed per worker on the calling thread,
//! builds a dedicated Rayon pool with one thread per worker, and runs every
//! worker through the loop
//!
//! ```text
//! SEEDED -> RUNNING -> (BATCH_DONE -> MERGING -> CHECKING)* -> STOPPED
//! ```
//!
//! until a worker declares the stop or observes a peer's declaration.

use tracing::{debug, trace};

use crate::rng::{RandomStream, SeedSource};

use super::aggregate::{Aggregator, MergeOutcome};
use super::convergence::StopReason;
use super::error::EngineError;
use super::observer::{NoopObserver, RunObserver};
use super::params::Parameters;
use super::result::SharedResult;
use super::trial::{run_batch, Trial};

/// Per-worker accounting for a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WorkerSummary {
    /// Worker index in `0..workers`.
    pub worker: usize,
    /// Seed of the worker's stream.
    pub seed: u64,
    /// Batches this worker merged.
    pub batches: u64,
    /// Logical draws taken from the worker's stream.
    pub draws: u64,
    /// Whether this worker declared the stop.
    pub declared_stop: bool,
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunReport {
    /// Final aggregate over every merged batch.
    pub result: SharedResult,
    /// Why the run stopped.
    pub stop_reason: StopReason,
    /// Batches merged across all workers.
    pub batches_merged: u64,
    /// One entry per worker, ordered by worker index.
    pub workers: Vec<WorkerSummary>,
}

/// Drives the parallel estimation.
///
/// # Examples
///
/// ```rust
/// use mc_engine::mc::{Coordinator, Parameters, StopReason, UniformDraw};
/// use mc_engine::rng::SeedSource;
///
/// let params = Parameters::builder()
///     .rtol(0.0)
///     .max_trials(10_000)
///     .batch_size(500)
///     .workers(2)
///     .build()
///     .unwrap();
///
/// let report = Coordinator::new(params)
///     .with_seed_source(SeedSource::Fixed(1))
///     .run(&UniformDraw)
///     .unwrap();
///
/// assert_eq!(report.stop_reason, StopReason::BudgetExhausted);
/// assert!(report.result.count() > 10_000);
/// ```
#[derive(Clone, Debug)]
pub struct Coordinator {
    params: Parameters,
    seed_source: SeedSource,
}

impl Coordinator {
    /// Creates a coordinator drawing seeds from OS entropy.
    pub fn new(params: Parameters) -> Self {
        Self {
            params,
            seed_source: SeedSource::Entropy,
        }
    }

    /// Replaces the seed source.
    pub fn with_seed_source(mut self, seed_source: SeedSource) -> Self {
        self.seed_source = seed_source;
        self
    }

    /// Returns the run parameters.
    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Returns the seed source.
    #[inline]
    pub fn seed_source(&self) -> SeedSource {
        self.seed_source
    }

    /// Runs the estimation without lifecycle hooks.
    pub fn run<T>(&self, trial: &T) -> Result<RunReport, EngineError>
    where
        T: Trial + ?Sized,
    {
        self.run_with_observer(trial, &NoopObserver)
    }

    /// Runs the estimation, reporting lifecycle events to `observer`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Config`] if the worker cap or any other parameter
    ///   check fails; no worker is created
    /// - [`EngineError::ThreadPool`] if the worker pool cannot be built
    /// - [`EngineError::Poisoned`] if the aggregation lock was poisoned
    pub fn run_with_observer<T, O>(&self, trial: &T, observer: &O) -> Result<RunReport, EngineError>
    where
        T: Trial + ?Sized,
        O: RunObserver + ?Sized,
    {
        let params = &self.params;
        params.validate()?;

        let n_workers = params.workers();
        let seeds = self.seed_source.generate(n_workers);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_workers)
            .thread_name(|index| format!("mc-worker-{}", index))
            .build()?;

        let aggregator = Aggregator::new();
        let mut outcomes: Vec<Option<Result<WorkerSummary, EngineError>>> =
            (0..n_workers).map(|_| None).collect();

        debug!(
            workers = n_workers,
            rtol = params.rtol(),
            max_trials = params.max_trials(),
            batch_size = params.batch_size(),
            seed_source = ?self.seed_source,
            "run started"
        );
        observer.on_run_started(params);

        pool.scope(|scope| {
            for ((worker, seed), slot) in seeds.into_iter().enumerate().zip(outcomes.iter_mut()) {
                let aggregator = &aggregator;
                scope.spawn(move |_| {
                    let stream = RandomStream::from_seed(seed);
                    *slot = Some(run_worker(worker, stream, trial, params, aggregator, observer));
                });
            }
        });

        let workers = outcomes
            .into_iter()
            .flatten()
            .collect::<Result<Vec<_>, _>>()?;
        let totals = aggregator.into_totals()?;
        let stop_reason = totals.stop.ok_or(EngineError::Unterminated)?;

        let report = RunReport {
            result: totals.result,
            stop_reason,
            batches_merged: totals.batches_merged,
            workers,
        };

        debug!(
            count = report.result.count(),
            mean = report.result.mean(),
            std_error = report.result.std_error(),
            batches = report.batches_merged,
            reason = %report.stop_reason,
            "run complete"
        );
        observer.on_run_complete(&report);

        Ok(report)
    }
}

/// Runs one worker until it stops.
///
/// The stream is owned by this call and dropped when the worker stops.
fn run_worker<T, O>(
    worker: usize,
    mut stream: RandomStream,
    trial: &T,
    params: &Parameters,
    aggregator: &Aggregator,
    observer: &O,
) -> Result<WorkerSummary, EngineError>
where
    T: Trial + ?Sized,
    O: RunObserver + ?Sized,
{
    let mut batches = 0;
    let mut declared_stop = false;

    loop {
        let partial = run_batch(&mut stream, trial, params.batch_size());
        let signal = aggregator.merge(&partial, params)?;
        batches += 1;

        trace!(
            worker,
            batch = batches,
            count = signal.snapshot.count(),
            outcome = ?signal.outcome,
            "batch merged"
        );
        observer.on_batch_merged(worker, &signal.snapshot);

        match signal.outcome {
            MergeOutcome::Continue => continue,
            MergeOutcome::Declared(reason) => {
                debug!(worker, %reason, count = signal.snapshot.count(), "stop declared");
                declared_stop = true;
                break;
            }
            MergeOutcome::PeerStopped => break,
        }
    }

    Ok(WorkerSummary {
        worker,
        seed: stream.seed(),
        batches,
        draws: stream.position(),
        declared_stop,
    })
}
