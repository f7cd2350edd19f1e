//! Stock-check orchestrator.
//!
//! Brings every tracked product's stored status up to date and notifies
//! subscribers of transitions. Cycles come from a timer
//! ([`Orchestrator::start_periodic`]) or on demand
//! ([`Orchestrator::force_check`]).
//!
//! # Guarantees
//!
//! - **Single-flight**: at most one cycle runs at a time. A start request
//!   during a running cycle is logged and dropped; there is no queue.
//! - **Always released**: the running flag is held by an RAII guard, so a
//!   failed or panicking cycle still returns the orchestrator to idle.
//! - **Isolated failures**: a failing product is logged and skipped; only a
//!   failure to list products ends a cycle early.
//! - **Paced**: products are checked one after another with a fixed delay in
//!   between, to stay polite to the shop.

mod cycle;
mod guard;
mod periodic;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

pub use cycle::{should_notify, CycleReport, ProductOutcome};
pub use guard::{FlightGuard, SingleFlight};
pub use periodic::PeriodicHandle;

use crate::error::Result;
use crate::port::{CheckControl, CheckRequest, Notifier, ProductStore, StockSource};
use cycle::CycleContext;

/// Timing policy for check cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerSettings {
    /// Time between timer-driven cycles.
    pub interval: Duration,
    /// Delay before the first cycle after [`Orchestrator::start_periodic`].
    pub initial_delay: Duration,
    /// Pause between two products within a cycle.
    pub pacing: Duration,
    /// Optional deadline for a single product check. `None` leaves bounding
    /// to the stock source's own request timeout.
    pub check_timeout: Option<Duration>,
}

impl Default for CheckerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5 * 60),
            initial_delay: Duration::from_secs(10),
            pacing: Duration::from_millis(2000),
            check_timeout: None,
        }
    }
}

/// What asked for a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Timer,
    Manual,
}

impl Trigger {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Timer => "timer",
            Self::Manual => "manual",
        }
    }
}

/// Orchestrator state as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Running,
}

/// Handle to the stock-check orchestrator.
///
/// Cheap to clone; all clones share one running flag.
#[derive(Clone)]
pub struct Orchestrator {
    context: Arc<CycleContext>,
    flight: SingleFlight,
}

impl Orchestrator {
    /// Create an idle orchestrator over the given collaborators.
    pub fn new(
        source: Arc<dyn StockSource>,
        store: Arc<dyn ProductStore>,
        notifier: Arc<dyn Notifier>,
        settings: CheckerSettings,
    ) -> Self {
        Self {
            context: Arc::new(CycleContext {
                source,
                store,
                notifier,
                settings,
            }),
            flight: SingleFlight::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &CheckerSettings {
        &self.context.settings
    }

    #[must_use]
    pub fn state(&self) -> CycleState {
        if self.flight.is_running() {
            CycleState::Running
        } else {
            CycleState::Idle
        }
    }

    /// Start a cycle in the background unless one is running.
    ///
    /// The guard is taken before the task is spawned, so two calls in a row
    /// can never both start a cycle.
    pub fn trigger(&self, trigger: Trigger) -> CheckRequest {
        let Some(guard) = self.flight.try_acquire() else {
            warn!(trigger = trigger.as_str(), "Check already running, skipping");
            return CheckRequest::AlreadyRunning;
        };

        let context = Arc::clone(&self.context);
        tokio::spawn(async move {
            // Errors are logged inside `run`.
            let _ = context.run(guard, trigger).await;
        });
        CheckRequest::Started
    }

    /// Run a cycle inline and wait for its report.
    ///
    /// Returns `None` when another cycle is already running.
    pub async fn run_now(&self) -> Option<Result<CycleReport>> {
        let Some(guard) = self.flight.try_acquire() else {
            warn!("Check already running, skipping");
            return None;
        };
        Some(self.context.run(guard, Trigger::Manual).await)
    }

    /// Arm the timer: one attempt after the initial delay, then one every
    /// `interval`.
    ///
    /// Stopping or dropping the returned handle cancels future firings but
    /// leaves a running cycle alone.
    pub fn start_periodic(&self, interval: Duration) -> PeriodicHandle {
        info!(
            interval_secs = interval.as_secs(),
            initial_delay_secs = self.context.settings.initial_delay.as_secs(),
            "Starting scheduler"
        );
        periodic::spawn(self.clone(), interval, self.context.settings.initial_delay)
    }
}

impl CheckControl for Orchestrator {
    fn force_check(&self) -> CheckRequest {
        info!("Forcing immediate stock check");
        self.trigger(Trigger::Manual)
    }

    fn is_running(&self) -> bool {
        self.flight.is_running()
    }
}
