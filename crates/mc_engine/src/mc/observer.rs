//! Run lifecycle hooks.
//!
//! The engine has no clock and prints nothing. A presentation layer that
//! wants wall-clock timing or progress output implements [`RunObserver`].

use super::coordinator::RunReport;
use super::params::Parameters;
use super::result::SharedResult;

/// Receives run lifecycle events.
///
/// `on_run_started` fires on the controlling thread after seeds are drawn
/// and before the first worker launches. `on_run_complete` fires after the
/// last worker has stopped. `on_batch_merged` fires on worker threads,
/// outside the aggregation lock. All methods default to no-ops.
pub trait RunObserver: Sync {
    /// Called once before any worker starts.
    fn on_run_started(&self, _params: &Parameters) {}

    /// Called by a worker after each of its batches is merged.
    fn on_batch_merged(&self, _worker: usize, _snapshot: &SharedResult) {}

    /// Called once after every worker has stopped.
    fn on_run_complete(&self, _report: &RunReport) {}
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
