//! Seed distribution for worker streams.
//!
//! Seeds are produced sequentially on the controlling thread, strictly before
//! any worker is spawned, so the seed-to-worker mapping is fixed before
//! concurrency begins.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where worker seeds come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeedSource {
    /// Draw seeds from a generator seeded once from OS entropy.
    #[default]
    Entropy,
    /// Derive seeds `base, base + 1, ...` for reproducible runs.
    ///
    /// Adjacent seeds are expanded by the generator's seeding routine, so
    /// the resulting streams are unrelated.
    Fixed(u64),
}

impl SeedSource {
    /// Produces `n` distinct seeds, one per worker.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mc_engine::rng::SeedSource;
    ///
    /// assert_eq!(SeedSource::Fixed(10).generate(3), vec![10, 11, 12]);
    /// ```
    pub fn generate(&self, n: usize) -> Vec<u64> {
        match *self {
            Self::Entropy => generate_seeds(n),
            Self::Fixed(base) => (0..n as u64).map(|i| base.wrapping_add(i)).collect(),
        }
    }
}

/// Draws `n` distinct seeds from an entropy-seeded generator.
///
/// A repeated value is redrawn, so the result never contains duplicates.
pub fn generate_seeds(n: usize) -> Vec<u64> {
    let mut source = StdRng::from_entropy();
    let mut seen = HashSet::with_capacity(n);
    let mut seeds = Vec::with_capacity(n);

    while seeds.len() < n {
        let seed: u64 = source.gen();
        if seen.insert(seed) {
            seeds.push(seed);
        }
    }

    seeds
}
