//! # Random Number Generation Infrastructure
//!
//! This module provides the per-worker random streams and the seed
//! distribution used by the Monte Carlo engine.
//!
//! ## Design Rationale
//!
//! - **Ownership**: every worker owns exactly one [`RandomStream`]; there is
//!   no process-wide generator and no locking around generation
//! - **Reproducibility**: a stream is a pure function of its seed
//! - **Independence**: seeds are distinct and expanded through the
//!   generator's own seeding routine, so neighbouring seeds give unrelated
//!   sequences
//!
//! ## Module Structure
//!
//! - [`stream`]: the seeded generator wrapper
//! - [`seed`]: one-shot seed distribution on the controlling thread
//!
//! ## Usage Example
//!
//! ```rust
//! use mc_engine::rng::{RandomStream, SeedSource};
//!
//! let seeds = SeedSource::Entropy.generate(4);
//! assert_eq!(seeds.len(), 4);
//!
//! let mut streams: Vec<RandomStream> =
//!     seeds.into_iter().map(RandomStream::from_seed).collect();
//!
//! let u = streams[0].next_uniform();
//! assert!((0.0..1.0).contains(&u));
//! ```

pub mod seed;
pub mod stream;

pub use seed::{generate_seeds, SeedSource};
pub use stream::RandomStream;

#[cfg(test)]
mod tests;
