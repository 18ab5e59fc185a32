//! Run parameters for the Monte Carlo engine.
//!
//! This module provides the immutable [`Parameters`] value and its builder.
//! Every field is validated at build time, so a constructed `Parameters` is
//! always safe to hand to the [`Coordinator`](super::Coordinator).

use super::error::ConfigError;

/// Hard cap on the number of worker threads.
pub const MAX_WORKERS: usize = 64;

/// Default relative tolerance.
pub const DEFAULT_RTOL: f64 = 1e-4;

/// Default trial budget.
pub const DEFAULT_MAX_TRIALS: u64 = 10_000_000;

/// Default number of trials per coordination round.
pub const DEFAULT_BATCH_SIZE: usize = 5_000;

/// Default verbosity level.
pub const DEFAULT_VERBOSITY: u8 = 1;

/// Returns the default worker count: available CPUs, capped at [`MAX_WORKERS`].
pub fn default_workers() -> usize {
    num_cpus::get().clamp(1, MAX_WORKERS)
}

/// Immutable estimation parameters.
///
/// Use [`ParametersBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use mc_engine::mc::Parameters;
///
/// let params = Parameters::builder()
///     .rtol(1e-3)
///     .max_trials(1_000_000)
///     .batch_size(1_000)
///     .workers(4)
///     .build()
///     .expect("valid parameters");
///
/// assert_eq!(params.workers(), 4);
/// assert_eq!(params.batch_size(), 1_000);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Parameters {
    /// Target ratio of standard error to mean.
    rtol: f64,
    /// Trial count beyond which the run stops regardless of precision.
    max_trials: u64,
    /// Trials per batch between two coordinations.
    batch_size: usize,
    /// Number of worker threads.
    workers: usize,
    /// Verbosity level for the presentation layer.
    verbosity: u8,
}

impl Parameters {
    /// Creates a new parameters builder.
    #[inline]
    pub fn builder() -> ParametersBuilder {
        ParametersBuilder::default()
    }

    /// Returns the relative tolerance.
    #[inline]
    pub fn rtol(&self) -> f64 {
        self.rtol
    }

    /// Returns the trial budget.
    #[inline]
    pub fn max_trials(&self) -> u64 {
        self.max_trials
    }

    /// Returns the batch size.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the worker count.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns the verbosity level.
    #[inline]
    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `rtol` is negative, infinite or NaN
    /// - `max_trials` is 0
    /// - `batch_size` is 0
    /// - `workers` is 0 or greater than [`MAX_WORKERS`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rtol.is_finite() || self.rtol < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.rtol));
        }
        if self.max_trials == 0 {
            return Err(ConfigError::InvalidMaxTrials(self.max_trials));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount(self.workers));
        }
        Ok(())
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            rtol: DEFAULT_RTOL,
            max_trials: DEFAULT_MAX_TRIALS,
            batch_size: DEFAULT_BATCH_SIZE,
            workers: default_workers(),
            verbosity: DEFAULT_VERBOSITY,
        }
    }
}

/// Builder for [`Parameters`].
///
/// Unset fields fall back to the defaults listed at module level.
#[derive(Clone, Debug, Default)]
pub struct ParametersBuilder {
    rtol: Option<f64>,
    max_trials: Option<u64>,
    batch_size: Option<usize>,
    workers: Option<usize>,
    verbosity: Option<u8>,
}

impl ParametersBuilder {
    /// Sets the relative tolerance.
    ///
    /// Zero is accepted and makes precision unreachable, so the run ends on
    /// the trial budget.
    #[inline]
    pub fn rtol(mut self, rtol: f64) -> Self {
        self.rtol = Some(rtol);
        self
    }

    /// Sets the trial budget.
    #[inline]
    pub fn max_trials(mut self, max_trials: u64) -> Self {
        self.max_trials = Some(max_trials);
        self
    }

    /// Sets the number of trials per batch.
    #[inline]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Sets the worker count, in `[1, MAX_WORKERS]`.
    #[inline]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Sets the verbosity level.
    #[inline]
    pub fn verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = Some(verbosity);
        self
    }

    /// Builds the parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any field fails [`Parameters::validate`].
    pub fn build(self) -> Result<Parameters, ConfigError> {
        let params = Parameters {
            rtol: self.rtol.unwrap_or(DEFAULT_RTOL),
            max_trials: self.max_trials.unwrap_or(DEFAULT_MAX_TRIALS),
            batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            workers: self.workers.unwrap_or_else(default_workers),
            verbosity: self.verbosity.unwrap_or(DEFAULT_VERBOSITY),
        };

        params.validate()?;
        Ok(params)
    }
}
