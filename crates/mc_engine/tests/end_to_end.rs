//! End-to-end tests for the parallel estimator.
//!
//! # Test Categories
//!
//! 1. **Reference run**: uniform draws converge to 1/2 within tolerance
//! 2. **Startup failures**: invalid parameters never reach a worker
//! 3. **Budget termination**: unreachable precision stops on the budget
//! 4. **Batch granularity**: batch size does not bias the numeric result

use std::sync::atomic::{AtomicU64, Ordering};

use approx::assert_relative_eq;
use mc_engine::mc::{
    Coordinator, FnTrial, GaussianSquare, Parameters, StopReason, UniformDraw, MAX_WORKERS,
};
use mc_engine::rng::{RandomStream, SeedSource};
use mc_engine::{ConfigError, EngineError};

// ============================================================================
// Reference run
// ============================================================================

#[test]
fn test_uniform_reference_run() {
    let params = Parameters::builder()
        .rtol(0.01)
        .max_trials(1_000_000)
        .batch_size(1_000)
        .workers(4)
        .build()
        .unwrap();

    let report = Coordinator::new(params).run(&UniformDraw).unwrap();
    let result = report.result;

    assert_eq!(report.stop_reason, StopReason::Converged);
    assert!(result.count() >= 1_000);
    assert!(result.count() <= 1_000_000);
    assert_eq!(result.count() % 1_000, 0);

    // Converged: standard error within 1% of the mean
    assert!(result.relative_error() < 0.01);
    // Mean within a generous band of the true value
    assert!(
        (result.mean() - 0.5).abs() < 5.0 * result.std_error() + 1e-3,
        "mean {} (+/- {})",
        result.mean(),
        result.std_error()
    );
}

#[test]
fn test_gaussian_square_run() {
    let params = Parameters::builder()
        .rtol(0.01)
        .batch_size(500)
        .workers(3)
        .build()
        .unwrap();

    let report = Coordinator::new(params)
        .with_seed_source(SeedSource::Fixed(8))
        .run(&GaussianSquare)
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::Converged);
    assert!((report.result.mean() - 1.0).abs() < 0.06);
}

// ============================================================================
// Startup failures
// ============================================================================

#[test]
fn test_worker_count_above_cap_fails_before_any_trial() {
    let trials_run = AtomicU64::new(0);
    let trial = FnTrial(|s: &mut RandomStream| {
        trials_run.fetch_add(1, Ordering::SeqCst);
        s.next_uniform()
    });

    let outcome = Parameters::builder()
        .workers(MAX_WORKERS + 1)
        .build()
        .map_err(EngineError::from)
        .and_then(|params| Coordinator::new(params).run(&trial));

    assert!(matches!(
        outcome,
        Err(EngineError::Config(ConfigError::InvalidWorkerCount(n))) if n == MAX_WORKERS + 1
    ));
    assert_eq!(trials_run.load(Ordering::SeqCst), 0);

    // The same pipeline with a valid worker count does run trials
    let params = Parameters::builder()
        .rtol(0.0)
        .max_trials(10)
        .batch_size(5)
        .workers(1)
        .build()
        .unwrap();
    Coordinator::new(params).run(&trial).unwrap();
    assert_eq!(trials_run.load(Ordering::SeqCst), 15);
}

#[test]
fn test_invalid_parameters_are_rejected() {
    assert!(Parameters::builder().workers(0).build().is_err());
    assert!(Parameters::builder().batch_size(0).build().is_err());
    assert!(Parameters::builder().max_trials(0).build().is_err());
    assert!(Parameters::builder().rtol(-0.5).build().is_err());
}

// ============================================================================
// Budget termination
// ============================================================================

#[test]
fn test_zero_tolerance_stops_on_budget() {
    let max_trials = 100_000;
    let params = Parameters::builder()
        .rtol(0.0)
        .max_trials(max_trials)
        .batch_size(1_000)
        .workers(4)
        .build()
        .unwrap();

    let report = Coordinator::new(params).run(&UniformDraw).unwrap();

    assert_eq!(report.stop_reason, StopReason::BudgetExhausted);
    assert!(report.result.count() > max_trials);
    // Each worker overshoots by at most the batch in flight when the stop landed
    assert!(report.result.count() <= max_trials + 4 * 1_000);
}

// ============================================================================
// Batch granularity
// ============================================================================

#[test]
fn test_batch_size_does_not_bias_result() {
    let run = |batch_size: usize| {
        let params = Parameters::builder()
            .rtol(0.0)
            .max_trials(99_999)
            .batch_size(batch_size)
            .workers(1)
            .build()
            .unwrap();

        Coordinator::new(params)
            .with_seed_source(SeedSource::Fixed(2024))
            .run(&UniformDraw)
            .unwrap()
            .result
    };

    let fine = run(1);
    let coarse = run(1_000);

    // Both stop on the first count above the budget: 100_000 trials
    assert_eq!(fine.count(), 100_000);
    assert_eq!(coarse.count(), 100_000);
    assert_relative_eq!(fine.sum(), coarse.sum(), max_relative = 1e-10);
    assert_relative_eq!(fine.sum_sq(), coarse.sum_sq(), max_relative = 1e-10);
    assert_relative_eq!(fine.mean(), coarse.mean(), max_relative = 1e-10);
}

#[test]
fn test_fixed_seed_single_worker_is_reproducible() {
    let params = Parameters::builder()
        .rtol(1e-3)
        .batch_size(256)
        .workers(1)
        .build()
        .unwrap();
    let coordinator = Coordinator::new(params).with_seed_source(SeedSource::Fixed(5));

    let first = coordinator.run(&UniformDraw).unwrap();
    let second = coordinator.run(&UniformDraw).unwrap();

    assert_eq!(first, second);
}
