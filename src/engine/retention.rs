use crate::clock::Clock;
use crate::db::{AlertFilter, AlertStore};
use crate::models::alert::AlertStatus;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    Deleted(u64),
    /// Another sweep was still running.
    Skipped,
    /// Store failure; already logged.
    Failed,
}

/// Purges resolved alerts once they are older than the retention window.
///
/// Age is measured from creation (`timestamp`), not from `resolvedAt`.
pub struct RetentionSweeper {
    store: Arc<dyn AlertStore>,
    clock: Arc<dyn Clock>,
    window: chrono::Duration,
    interval: Duration,
    running: Mutex<()>,
}

impl RetentionSweeper {
    pub fn new(
        store: Arc<dyn AlertStore>,
        clock: Arc<dyn Clock>,
        window: chrono::Duration,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            window,
            interval,
            running: Mutex::new(()),
        }
    }

    pub async fn sweep(&self, reference_time: DateTime<Utc>) -> SweepOutcome {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("Retention sweep already in progress, skipping");
            return SweepOutcome::Skipped;
        };

        let cutoff = reference_time - self.window;
        let filter = AlertFilter {
            status: Some(AlertStatus::Resolved),
            created_before: Some(cutoff),
            ..Default::default()
        };

        match self.store.delete_many(&filter).await {
            Ok(deleted) => {
                info!(
                    "Cleared {} resolved alerts created before {}",
                    deleted, cutoff
                );
                SweepOutcome::Deleted(deleted)
            }
            Err(e) => {
                error!("Error clearing old alerts: {}", e);
                SweepOutcome::Failed
            }
        }
    }

    /// Sweep every `interval` until cancelled. The first sweep happens one
    /// interval after start; ticks missed during a slow sweep are dropped.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            "Retention sweeper started (window {} min, every {} s)",
            self.window.num_minutes(),
            self.interval.as_secs()
        );

        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Retention sweeper stopping");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep(self.clock.now()).await;
                }
            }
        }
    }
}
