//! Timer that drives check cycles.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::{Orchestrator, Trigger};

/// Handle to a running scheduler.
///
/// Stopping (or dropping) the handle prevents future timer firings. A cycle
/// that is already running finishes on its own.
pub struct PeriodicHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PeriodicHandle {
    /// Cancel future firings.
    pub fn stop(&self) {
        if self.shutdown.send(true).is_ok() {
            info!("Scheduler stopped");
        }
    }

    /// True once the timer task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop and wait for the timer task to exit.
    pub async fn shutdown(self) {
        self.stop();
        let _ = self.task.await;
    }
}

pub(super) fn spawn(
    orchestrator: Orchestrator,
    interval: Duration,
    initial_delay: Duration,
) -> PeriodicHandle {
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                debug!("Scheduler stopped before initial check");
                return;
            }
            () = tokio::time::sleep(initial_delay) => {
                orchestrator.trigger(Trigger::Startup);
            }
        }

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Also fires with Err when the handle is dropped.
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => {
                    orchestrator.trigger(Trigger::Timer);
                }
            }
        }

        debug!("Scheduler task exiting");
    });

    PeriodicHandle { shutdown, task }
}
