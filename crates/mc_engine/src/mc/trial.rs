//! Trials and batch execution.
//!
//! A [`Trial`] draws one independent sample of the quantity under
//! estimation from a worker's [`RandomStream`]. [`run_batch`] runs a fixed
//! number of trials and returns their moments as a [`PartialResult`].
//!
//! Nothing here touches shared state, so batches run fully in parallel
//! without synchronisation.

use crate::rng::RandomStream;

use super::result::PartialResult;

/// One independent sample of the quantity under estimation.
///
/// Implementations must be `Sync`: every worker samples the same trial
/// concurrently, each with its own stream.
pub trait Trial: Sync {
    /// Draws one sample using `stream`.
    fn sample(&self, stream: &mut RandomStream) -> f64;
}

/// A single uniform draw on [0, 1); expectation 1/2.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformDraw;

impl Trial for UniformDraw {
    #[inline]
    fn sample(&self, stream: &mut RandomStream) -> f64 {
        stream.next_uniform()
    }
}

/// Indicator that a uniform point in the unit square lies inside the
/// quarter disc; expectation π/4.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuarterCircle;

impl Trial for QuarterCircle {
    #[inline]
    fn sample(&self, stream: &mut RandomStream) -> f64 {
        let x = stream.next_uniform();
        let y = stream.next_uniform();
        if x * x + y * y <= 1.0 {
            1.0
        } else {
            0.0
        }
    }
}

/// Square of a standard normal draw; expectation 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct GaussianSquare;

impl Trial for GaussianSquare {
    #[inline]
    fn sample(&self, stream: &mut RandomStream) -> f64 {
        let z = stream.next_normal();
        z * z
    }
}

/// Adapts a closure into a [`Trial`].
///
/// # Examples
///
/// ```rust
/// use mc_engine::mc::{run_batch, FnTrial};
/// use mc_engine::rng::RandomStream;
///
/// // E[U^2] = 1/3
/// let trial = FnTrial(|s: &mut RandomStream| {
///     let u = s.next_uniform();
///     u * u
/// });
///
/// let mut stream = RandomStream::from_seed(3);
/// let partial = run_batch(&mut stream, &trial, 10_000);
/// assert!((partial.mean() - 1.0 / 3.0).abs() < 0.02);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FnTrial<F>(pub F);

impl<F> Trial for FnTrial<F>
where
    F: Fn(&mut RandomStream) -> f64 + Sync,
{
    #[inline]
    fn sample(&self, stream: &mut RandomStream) -> f64 {
        (self.0)(stream)
    }
}

/// Runs `batch_size` trials against `stream`.
///
/// Accumulates the sum and sum of squares locally and returns them with the
/// trial count. A zero batch size yields an empty result.
pub fn run_batch<T>(stream: &mut RandomStream, trial: &T, batch_size: usize) -> PartialResult
where
    T: Trial + ?Sized,
{
    let mut sum = 0.0;
    let mut sum_sq = 0.0;

    for _ in 0..batch_size {
        let x = trial.sample(stream);
        sum += x;
        sum_sq += x * x;
    }

    PartialResult::new(sum, sum_sq, batch_size as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_run_batch_counts_trials() {
        let mut stream = RandomStream::from_seed(1);
        let partial = run_batch(&mut stream, &UniformDraw, 1_000);

        assert_eq!(partial.count, 1_000);
        assert_eq!(stream.position(), 1_000);
        assert!(partial.sum > 0.0 && partial.sum < 1_000.0);
        assert!(partial.sum_sq < partial.sum);
    }

    #[test]
    fn test_run_batch_empty() {
        let mut stream = RandomStream::from_seed(1);
        let partial = run_batch(&mut stream, &UniformDraw, 0);

        assert_eq!(partial, PartialResult::default());
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_run_batch_matches_manual_accumulation() {
        let mut a = RandomStream::from_seed(77);
        let mut b = RandomStream::from_seed(77);

        let partial = run_batch(&mut a, &UniformDraw, 100);

        let draws: Vec<f64> = (0..100).map(|_| b.next_uniform()).collect();
        assert_eq!(partial.sum, draws.iter().sum::<f64>());
        assert_eq!(partial.sum_sq, draws.iter().map(|x| x * x).sum::<f64>());
    }

    #[test]
    fn test_constant_trial() {
        let mut stream = RandomStream::from_seed(0);
        let partial = run_batch(&mut stream, &FnTrial(|_: &mut RandomStream| 2.0), 10);

        assert_relative_eq!(partial.sum, 20.0);
        assert_relative_eq!(partial.sum_sq, 40.0);
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_quarter_circle_estimates_pi() {
        let mut stream = RandomStream::from_seed(314);
        let partial = run_batch(&mut stream, &QuarterCircle, 200_000);

        assert_eq!(stream.position(), 400_000);
        assert!((4.0 * partial.mean() - std::f64::consts::PI).abs() < 0.02);
        // Indicator samples: x^2 == x
        assert_eq!(partial.sum, partial.sum_sq);
    }

    #[test]
    fn test_gaussian_square_mean_is_one() {
        let mut stream = RandomStream::from_seed(271);
        let partial = run_batch(&mut stream, &GaussianSquare, 200_000);

        assert!((partial.mean() - 1.0).abs() < 0.02, "mean = {}", partial.mean());
    }

    #[test]
    fn test_trait_object_dispatch() {
        let trial: &dyn Trial = &UniformDraw;
        let mut stream = RandomStream::from_seed(9);
        let partial = run_batch(&mut stream, trial, 10);
        assert_eq!(partial.count, 10);
    }
}
