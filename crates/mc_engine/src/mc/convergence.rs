//! Adaptive stopping rule.
//!
//! With `n` trials merged, the estimator's variance is `var(X) / n`. The run
//! stops when its ratio to the squared mean falls below `rtol^2`, i.e. when
//! the one-sigma error bar is within `rtol` of the mean, or when `n` exceeds
//! the trial budget.
//!
//! # Degenerate mean
//!
//! The relative test divides by `mean^2`. When `mean^2` is zero or
//! subnormal (`<= f64::MIN_POSITIVE`) the evaluator falls back to an
//! absolute criterion, `var(X) / n < rtol^2`, so a zero-mean quantity still
//! converges once its standard error drops below `rtol`.

use super::params::Parameters;
use super::result::SharedResult;

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StopReason {
    /// The precision target was met.
    Converged,
    /// The trial count exceeded the budget before the target was met.
    BudgetExhausted,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Converged => write!(f, "converged"),
            Self::BudgetExhausted => write!(f, "trial budget exhausted"),
        }
    }
}

/// Evaluates the stopping rule, returning the reason to stop if any.
///
/// Precision is checked first, so a run meeting both criteria reports
/// [`StopReason::Converged`]. An empty aggregate never stops.
pub fn evaluate(params: &Parameters, shared: &SharedResult) -> Option<StopReason> {
    if shared.is_empty() {
        return None;
    }

    let n = shared.count() as f64;
    let mean = shared.sum() / n;
    let mean_sq = shared.sum_sq() / n;
    let var = (mean_sq - mean * mean).max(0.0);
    let var_of_mean = var / n;
    let tol_sq = params.rtol() * params.rtol();

    let precise = if mean * mean > f64::MIN_POSITIVE {
        var_of_mean / (mean * mean) < tol_sq
    } else {
        var_of_mean < tol_sq
    };

    if precise {
        Some(StopReason::Converged)
    } else if shared.count() > params.max_trials() {
        Some(StopReason::BudgetExhausted)
    } else {
        None
    }
}

/// Returns `true` when the run should halt.
///
/// Read-only over `shared`; callers hold the aggregation lock so the value
/// reflects only fully merged batches.
#[inline]
pub fn is_converged(params: &Parameters, shared: &SharedResult) -> bool {
    evaluate(params, shared).is_some()
}
