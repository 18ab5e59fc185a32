//! Error types for the Monte Carlo engine.
//!
//! Configuration errors are raised while building [`Parameters`] and are
//! fatal: no worker is created. Engine errors cover the remaining
//! infrastructure failures of a run.
//!
//! [`Parameters`]: super::Parameters

use thiserror::Error;

use super::params::MAX_WORKERS;

/// Configuration error for the Monte Carlo engine.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Relative tolerance negative, infinite or NaN.
    #[error("Invalid relative tolerance {0}: must be finite and non-negative")]
    InvalidTolerance(f64),

    /// Trial budget of zero.
    #[error("Invalid trial budget {0}: must be at least 1")]
    InvalidMaxTrials(u64),

    /// Batch size of zero.
    #[error("Invalid batch size {0}: must be at least 1")]
    InvalidBatchSize(usize),

    /// Worker count outside `[1, MAX_WORKERS]`.
    #[error("Invalid worker count {0}: must be in range [1, {max}]", max = MAX_WORKERS)]
    InvalidWorkerCount(usize),
}

/// Error raised while running an estimation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Parameters rejected at startup.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The worker thread pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A worker panicked while holding the aggregation lock.
    #[error("Shared result lock poisoned")]
    Poisoned,

    /// Every worker exited but no stop decision was recorded.
    #[error("Run finished without a stop decision")]
    Unterminated,
}
