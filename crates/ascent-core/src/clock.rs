//! Autonomous clock driver.
//!
//! [`ClockDriver`] owns a tokio task that calls [`SimulationContext::tick`]
//! once per interval, independently of the command loop. The first tick
//! fires after the configured start delay. If the task falls behind, missed
//! ticks are delayed rather than fired in a burst.
//!
//! The clock keeps ticking after the flight reaches a terminal phase: the
//! physics no longer change but the tick counter and the per-tick snapshot
//! still advance.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::context::SimulationContext;

/// Errors that can occur when stopping the clock.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The clock task panicked or was aborted.
    #[error("clock task failed: {source}")]
    Join {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Summary returned when the clock is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReport {
    /// Number of ticks the clock fired.
    pub ticks_fired: u64,
}

/// Handle to a running clock task.
#[derive(Debug)]
pub struct ClockDriver {
    cancel: CancellationToken,
    handle: JoinHandle<u64>,
    interval: Duration,
}

impl ClockDriver {
    /// Start ticking `sim` every `interval`, beginning after `start_delay`.
    ///
    /// Must be called from within a tokio runtime. A zero `interval` is
    /// raised to one millisecond.
    pub fn spawn(sim: Arc<SimulationContext>, interval: Duration, start_delay: Duration) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let now = Instant::now();
            let start = now.checked_add(start_delay).unwrap_or(now);
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut fired: u64 = 0;
            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let snapshot = sim.tick();
                        fired = fired.saturating_add(1);
                        debug!(tick = snapshot.elapsed_ticks, fired, "clock tick");
                    }
                }
            }
            fired
        });

        info!(
            interval_ms = interval.as_millis(),
            start_delay_ms = start_delay.as_millis(),
            "clock started"
        );

        Self {
            cancel,
            handle,
            interval,
        }
    }

    /// The effective tick interval.
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the clock task is still running.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop the clock and wait for the task to finish. A tick already in
    /// progress completes first.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Join`] if the clock task panicked.
    pub async fn stop(self) -> Result<ClockReport, ClockError> {
        self.cancel.cancel();
        let ticks_fired = self.handle.await?;
        info!(ticks_fired, "clock stopped");
        Ok(ClockReport { ticks_fired })
    }
}
