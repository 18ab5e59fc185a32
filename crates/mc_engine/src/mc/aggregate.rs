//! Shared aggregation state and the stop flag.
//!
//! [`Aggregator`] owns the run's [`SharedResult`] and stop decision behind a
//! single mutex. A worker enters the critical section once per batch: three
//! additions, one convergence check, one flag read or write. The cost is
//! independent of the batch size.

use std::sync::{Mutex, MutexGuard};

use super::convergence::{evaluate, StopReason};
use super::error::EngineError;
use super::params::Parameters;
use super::result::{PartialResult, SharedResult};

/// What a worker should do after merging a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Neither this worker nor a peer has stopped the run.
    Continue,
    /// This merge met a stopping criterion; the stop flag is now set.
    Declared(StopReason),
    /// A peer already stopped the run.
    PeerStopped,
}

impl MergeOutcome {
    /// Returns `true` if the worker should stop.
    #[inline]
    pub fn is_stop(&self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// Result of one merge, with a copy of the aggregate taken inside the lock.
#[derive(Clone, Copy, Debug)]
pub struct MergeSignal {
    /// Continue or stop.
    pub outcome: MergeOutcome,
    /// Aggregate immediately after this merge.
    pub snapshot: SharedResult,
}

#[derive(Debug, Default)]
struct AggregateState {
    result: SharedResult,
    stop: Option<StopReason>,
    batches_merged: u64,
}

/// Final aggregate state once every worker has stopped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregateTotals {
    /// Cumulative moments.
    pub result: SharedResult,
    /// First stop decision recorded, if any.
    pub stop: Option<StopReason>,
    /// Number of batches merged across all workers.
    pub batches_merged: u64,
}

/// Mutex-guarded running total plus stop flag.
///
/// # Examples
///
/// ```rust
/// use mc_engine::mc::{Aggregator, MergeOutcome, Parameters, PartialResult, StopReason};
///
/// let params = Parameters::builder().rtol(0.0).max_trials(2).workers(1).build().unwrap();
/// let aggregator = Aggregator::new();
///
/// let first = aggregator.merge(&PartialResult::new(1.0, 1.0, 2), &params).unwrap();
/// assert_eq!(first.outcome, MergeOutcome::Continue);
///
/// let second = aggregator.merge(&PartialResult::new(1.0, 1.0, 2), &params).unwrap();
/// assert_eq!(second.outcome, MergeOutcome::Declared(StopReason::BudgetExhausted));
/// assert!(aggregator.is_stopped().unwrap());
/// ```
#[derive(Debug, Default)]
pub struct Aggregator {
    state: Mutex<AggregateState>,
}

impl Aggregator {
    /// Creates an aggregator with a zeroed result and a clear stop flag.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, AggregateState>, EngineError> {
        self.state.lock().map_err(|_| EngineError::Poisoned)
    }

    /// Merges `partial` and decides whether the calling worker continues.
    ///
    /// Inside one critical section: add the partial, evaluate the stopping
    /// rule on the updated total, then either set the stop flag or re-read
    /// it. Only the first stop decision is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Poisoned`] if another thread panicked while
    /// holding the lock.
    pub fn merge(
        &self,
        partial: &PartialResult,
        params: &Parameters,
    ) -> Result<MergeSignal, EngineError> {
        let mut state = self.lock()?;
        state.result.merge(partial);
        state.batches_merged += 1;

        let outcome = match evaluate(params, &state.result) {
            Some(reason) if state.stop.is_none() => {
                state.stop = Some(reason);
                MergeOutcome::Declared(reason)
            }
            Some(_) => MergeOutcome::PeerStopped,
            None if state.stop.is_some() => MergeOutcome::PeerStopped,
            None => MergeOutcome::Continue,
        };

        Ok(MergeSignal {
            outcome,
            snapshot: state.result,
        })
    }

    /// Reads the stop flag.
    pub fn is_stopped(&self) -> Result<bool, EngineError> {
        Ok(self.lock()?.stop.is_some())
    }

    /// Returns a copy of the current aggregate.
    pub fn snapshot(&self) -> Result<SharedResult, EngineError> {
        Ok(self.lock()?.result)
    }

    /// Consumes the aggregator, returning its final state.
    pub fn into_totals(self) -> Result<AggregateTotals, EngineError> {
        let state = self.state.into_inner().map_err(|_| EngineError::Poisoned)?;
        Ok(AggregateTotals {
            result: state.result,
            stop: state.stop,
            batches_merged: state.batches_merged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn params(rtol: f64, max_trials: u64) -> Parameters {
        Parameters::builder()
            .rtol(rtol)
            .max_trials(max_trials)
            .workers(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_first_stop_is_declared_then_peers_see_it() {
        let p = params(0.0, 5);
        let aggregator = Aggregator::new();
        let batch = PartialResult::new(3.0, 3.0, 3);

        assert_eq!(aggregator.merge(&batch, &p).unwrap().outcome, MergeOutcome::Continue);
        assert_eq!(
            aggregator.merge(&batch, &p).unwrap().outcome,
            MergeOutcome::Declared(StopReason::BudgetExhausted)
        );
        assert_eq!(aggregator.merge(&batch, &p).unwrap().outcome, MergeOutcome::PeerStopped);

        let totals = aggregator.into_totals().unwrap();
        assert_eq!(totals.stop, Some(StopReason::BudgetExhausted));
        assert_eq!(totals.batches_merged, 3);
        assert_eq!(totals.result.count(), 9);
    }

    #[test]
    fn test_snapshot_reflects_merges() {
        let p = params(0.0, u64::MAX);
        let aggregator = Aggregator::new();

        let signal = aggregator.merge(&PartialResult::new(2.0, 4.0, 1), &p).unwrap();
        assert_eq!(signal.snapshot.count(), 1);
        assert_eq!(aggregator.snapshot().unwrap(), signal.snapshot);
        assert!(!aggregator.is_stopped().unwrap());
        assert!(!signal.outcome.is_stop());
    }

    #[test]
    fn test_concurrent_merges_are_not_lost() {
        let p = Arc::new(params(0.0, u64::MAX));
        let aggregator = Arc::new(Aggregator::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let p = Arc::clone(&p);
                let aggregator = Arc::clone(&aggregator);
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        aggregator.merge(&PartialResult::new(1.0, 1.0, 1), &p).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let totals = Arc::try_unwrap(aggregator).unwrap().into_totals().unwrap();
        assert_eq!(totals.result.count(), 8_000);
        assert_eq!(totals.result.sum(), 8_000.0);
        assert_eq!(totals.batches_merged, 8_000);
        assert_eq!(totals.stop, None);
    }
}
