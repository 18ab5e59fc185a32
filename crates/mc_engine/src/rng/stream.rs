//! Per-worker pseudo-random stream.
//!
//! [`RandomStream`] wraps a seeded [`StdRng`] and counts how many values it
//! has produced. It is deliberately not `Clone`: two live streams can never
//! share generator state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Seeded random stream owned by a single worker.
///
/// The backing generator is `StdRng` (ChaCha12 in `rand` 0.8). Its period
/// is far beyond any realistic trial count, so generation never fails or
/// wraps around during a run.
///
/// # Examples
///
/// ```rust
/// use mc_engine::rng::RandomStream;
///
/// let mut a = RandomStream::from_seed(7);
/// let mut b = RandomStream::from_seed(7);
///
/// assert_eq!(a.next_uniform(), b.next_uniform());
/// assert_eq!(a.position(), 1);
/// ```
#[derive(Debug)]
pub struct RandomStream {
    /// The underlying PRNG instance.
    inner: StdRng,
    /// The seed used for initialisation.
    seed: u64,
    /// Number of draws taken so far.
    position: u64,
}

impl RandomStream {
    /// Creates a stream initialised from `seed`.
    ///
    /// Construction is total: every seed is valid, and the same seed always
    /// yields the same sequence.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
            position: 0,
        }
    }

    /// Returns the seed this stream was created from.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of values drawn since construction.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Advances the stream by one step and returns a uniform value in [0, 1).
    #[inline]
    pub fn next_uniform(&mut self) -> f64 {
        self.position += 1;
        self.inner.gen()
    }

    /// Advances the stream by one step and returns a standard normal variate.
    ///
    /// Sampling goes through `rand_distr::StandardNormal` (Ziggurat), which
    /// may consume more than one raw word from the generator; the position
    /// still advances by one logical draw.
    #[inline]
    pub fn next_normal(&mut self) -> f64 {
        self.position += 1;
        StandardNormal.sample(&mut self.inner)
    }

    /// Fills `buffer` with uniform values in [0, 1).
    ///
    /// Equivalent to calling [`next_uniform`](Self::next_uniform) once per
    /// element. Empty buffers are a no-op.
    pub fn fill_uniform(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.inner.gen();
        }
        self.position += buffer.len() as u64;
    }
}
