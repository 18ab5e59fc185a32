//! Parallel Monte Carlo estimation with adaptive termination.
//!
//! # Architecture
//!
//! ```text
//! Coordinator
//! ├── Parameters        (validated run configuration)
//! ├── SeedSource        (one seed per worker, drawn up front)
//! └── workers (rayon pool, one thread each)
//!     ├── RandomStream  (owned, never shared)
//!     ├── run_batch()   -> PartialResult
//!     └── Aggregator    (mutex: SharedResult + stop flag)
//!         └── evaluate() / is_converged()
//! ```
//!
//! # Examples
//!
//! ## Estimating π/4
//!
//! ```rust
//! use mc_engine::mc::{Coordinator, Parameters, QuarterCircle};
//!
//! let params = Parameters::builder()
//!     .rtol(5e-3)
//!     .max_trials(10_000_000)
//!     .batch_size(2_000)
//!     .workers(2)
//!     .build()
//!     .unwrap();
//!
//! let report = Coordinator::new(params).run(&QuarterCircle).unwrap();
//! let pi = 4.0 * report.result.mean();
//! assert!((pi - std::f64::consts::PI).abs() < 0.1);
//! ```
//!
//! ## Custom trials
//!
//! ```rust
//! use mc_engine::mc::{Coordinator, FnTrial, Parameters};
//! use mc_engine::rng::RandomStream;
//!
//! // E[max(U1, U2)] = 2/3
//! let trial = FnTrial(|s: &mut RandomStream| s.next_uniform().max(s.next_uniform()));
//!
//! let params = Parameters::builder().rtol(1e-2).workers(2).build().unwrap();
//! let report = Coordinator::new(params).run(&trial).unwrap();
//! assert!((report.result.mean() - 2.0 / 3.0).abs() < 0.05);
//! ```

pub mod aggregate;
pub mod convergence;
pub mod coordinator;
pub mod error;
pub mod observer;
pub mod params;
pub mod result;
pub mod trial;

// Re-exports for convenient access
pub use aggregate::{AggregateTotals, Aggregator, MergeOutcome, MergeSignal};
pub use convergence::{evaluate, is_converged, StopReason};
pub use coordinator::{Coordinator, RunReport, WorkerSummary};
pub use error::{ConfigError, EngineError};
pub use observer::{NoopObserver, RunObserver};
pub use params::{default_workers, Parameters, ParametersBuilder, MAX_WORKERS};
pub use result::{PartialResult, SharedResult};
pub use trial::{run_batch, FnTrial, GaussianSquare, QuarterCircle, Trial, UniformDraw};
