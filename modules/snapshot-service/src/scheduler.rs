//! Drives the reconciler at a fixed interval.

use std::time::Duration;

use anyhow::Result;
use tokio::time::{sleep, Instant};
use tracing::{error, info};

use crate::reconciler::Reconciler;
use crate::traits::{BookmarkStore, SnapshotFetcher};

/// How long the polling loop should live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Poll until interrupted.
    Continuous,
    /// Poll until `ceiling` of wall-clock time has accumulated, then
    /// exit cleanly. For platforms that recycle worker processes on a
    /// timer.
    Bounded { ceiling: Duration },
}

pub struct Scheduler {
    poll_interval: Duration,
    mode: RunMode,
}

impl Scheduler {
    pub fn new(poll_interval: Duration, mode: RunMode) -> Self {
        Self {
            poll_interval,
            mode,
        }
    }

    /// Run cycles until the mode says stop or an interrupt lands.
    ///
    /// An interrupt never aborts an in-flight cycle; it is observed at
    /// the next sleep, so the current pass always drains. A failed cycle
    /// (e.g. the listing call itself) is logged and retried after the
    /// normal interval.
    pub async fn run<F, S>(&self, reconciler: &Reconciler<F, S>) -> Result<()>
    where
        F: SnapshotFetcher,
        S: BookmarkStore,
    {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            mode = ?self.mode,
            "Snapshot polling started"
        );

        let started = Instant::now();
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            if let Err(e) = reconciler.run_cycle().await {
                error!(error = %e, "Reconciliation cycle failed, retrying after interval");
            }

            let nap = match self.mode {
                RunMode::Continuous => self.poll_interval,
                RunMode::Bounded { ceiling } => {
                    let elapsed = started.elapsed();
                    if elapsed >= ceiling {
                        info!("Run budget exhausted, stopping");
                        return Ok(());
                    }
                    // Truncate the final sleep so total runtime lands
                    // exactly on the ceiling.
                    self.poll_interval.min(ceiling - elapsed)
                }
            };

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Interrupt received, shutting down");
                    return Ok(());
                }
                _ = sleep(nap) => {}
            }

            if let RunMode::Bounded { ceiling } = self.mode {
                if started.elapsed() >= ceiling {
                    info!("Run budget exhausted, stopping");
                    return Ok(());
                }
            }
        }
    }
}
