//! Wall-clock timing around an estimation run.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use mc_engine::mc::{Parameters, RunObserver, RunReport};
use tracing::info;

/// Records the elapsed time between the engine's start and completion
/// events.
#[derive(Debug, Default)]
pub struct WallClock {
    started: Mutex<Option<Instant>>,
    elapsed: Mutex<Option<Duration>>,
}

impl WallClock {
    /// Creates an idle clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed time of the last completed run.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed.lock().ok().and_then(|guard| *guard)
    }
}

impl RunObserver for WallClock {
    fn on_run_started(&self, params: &Parameters) {
        info!(workers = params.workers(), "Run started");
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
    }

    fn on_run_complete(&self, report: &RunReport) {
        let started = self.started.lock().ok().and_then(|guard| *guard);
        if let Some(started) = started {
            let elapsed = started.elapsed();
            info!(
                elapsed_ms = elapsed.as_millis() as u64,
                trials = report.result.count(),
                "Run complete"
            );
            if let Ok(mut slot) = self.elapsed.lock() {
                *slot = Some(elapsed);
            }
        }
    }
}
