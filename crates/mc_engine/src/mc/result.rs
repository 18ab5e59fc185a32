//! Partial and cumulative sample moments.
//!
//! A [`PartialResult`] is what one batch on one worker produces. The
//! [`SharedResult`] is the running total of every partial merged so far, and
//! is the only quantity the stopping rule reads.

/// Moments of one batch of trials.
///
/// Pure value type; merged into a [`SharedResult`] and then discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PartialResult {
    /// Sum of sampled values.
    pub sum: f64,
    /// Sum of squared sampled values.
    pub sum_sq: f64,
    /// Number of trials in the batch.
    pub count: u64,
}

impl PartialResult {
    /// Creates a partial result from raw sums.
    #[inline]
    pub fn new(sum: f64, sum_sq: f64, count: u64) -> Self {
        Self { sum, sum_sq, count }
    }

    /// Returns the batch mean, or 0 for an empty batch.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Running aggregate across all workers.
///
/// Fields are private: the only mutation is [`merge`](Self::merge), which
/// keeps the aggregate equal to the element-wise sum of every merged
/// [`PartialResult`].
///
/// # Examples
///
/// ```rust
/// use mc_engine::mc::{PartialResult, SharedResult};
///
/// let mut shared = SharedResult::new();
/// shared.merge(&PartialResult::new(1.0, 1.0, 2));
/// shared.merge(&PartialResult::new(2.0, 4.0, 2));
///
/// assert_eq!(shared.count(), 4);
/// assert_eq!(shared.mean(), 0.75);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SharedResult {
    sum: f64,
    sum_sq: f64,
    count: u64,
}

impl SharedResult {
    /// Creates an empty aggregate.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a partial result into the aggregate.
    ///
    /// Commutative and associative up to floating-point summation order.
    #[inline]
    pub fn merge(&mut self, partial: &PartialResult) {
        self.sum += partial.sum;
        self.sum_sq += partial.sum_sq;
        self.count += partial.count;
    }

    /// Returns the cumulative sum.
    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Returns the cumulative sum of squares.
    #[inline]
    pub fn sum_sq(&self) -> f64 {
        self.sum_sq
    }

    /// Returns the cumulative trial count.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns `true` if nothing has been merged yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Sample mean, or 0 when empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Population variance `E[X^2] - E[X]^2`, clamped at zero.
    ///
    /// Rounding can push the raw difference slightly negative for
    /// near-constant samples.
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        (self.sum_sq / n - mean * mean).max(0.0)
    }

    /// Estimated variance of the mean estimator, `variance / n`.
    pub fn variance_of_mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.variance() / self.count as f64
    }

    /// Standard error of the mean.
    pub fn std_error(&self) -> f64 {
        self.variance_of_mean().sqrt()
    }

    /// Ratio of standard error to the absolute mean.
    ///
    /// Infinite when the mean is zero and the standard error is not.
    pub fn relative_error(&self) -> f64 {
        let std_error = self.std_error();
        if std_error == 0.0 {
            return 0.0;
        }
        std_error / self.mean().abs()
    }
}

impl From<PartialResult> for SharedResult {
    fn from(partial: PartialResult) -> Self {
        let mut shared = Self::new();
        shared.merge(&partial);
        shared
    }
}
