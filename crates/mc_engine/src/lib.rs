//! # Monte Carlo Engine (Kernel Layer)
//!
//! `mc_engine` estimates the expectation of a random quantity, together with
//! its standard error, by running independent trials on many worker threads
//! and stopping as soon as the relative precision reaches a target or the
//! trial budget runs out.
//!
//! ## Components
//!
//! - [`rng::RandomStream`]: one owned generator per worker, seeded once
//! - [`rng::SeedSource`]: hands out distinct seeds before any worker starts
//! - [`mc::run_batch`]: runs a batch of trials into a [`mc::PartialResult`]
//! - [`mc::SharedResult`]: the running aggregate every worker merges into
//! - [`mc::is_converged`]: the adaptive stopping rule
//! - [`mc::Coordinator`]: owns the worker pool and the stop decision
//!
//! ## Usage Example
//!
//! ```rust
//! use mc_engine::mc::{Coordinator, Parameters, UniformDraw};
//! use mc_engine::rng::SeedSource;
//!
//! let params = Parameters::builder()
//!     .rtol(1e-2)
//!     .max_trials(1_000_000)
//!     .batch_size(1_000)
//!     .workers(2)
//!     .build()
//!     .unwrap();
//!
//! let report = Coordinator::new(params)
//!     .with_seed_source(SeedSource::Fixed(42))
//!     .run(&UniformDraw)
//!     .unwrap();
//!
//! assert!((report.result.mean() - 0.5).abs() < 0.05);
//! ```
//!
//! ## Concurrency Model
//!
//! Trials never touch shared state. Each worker synchronises once per batch,
//! inside a critical section that performs three additions and one
//! convergence check. The stop flag lives under the same lock as the
//! aggregate, so a stop decision is always computed from fully merged
//! batches.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod rng;

pub use mc::{ConfigError, EngineError};
