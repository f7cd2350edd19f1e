//! Check cycle timing configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::application::CheckerSettings;

/// `[checker]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Minutes between timer-driven cycles.
    pub interval_minutes: u64,
    /// Seconds before the first cycle after startup.
    pub initial_delay_secs: u64,
    /// Milliseconds to wait between two products in a cycle.
    pub pacing_millis: u64,
    /// Page download timeout.
    pub request_timeout_secs: u64,
    /// Optional overall deadline for one product check.
    pub check_timeout_secs: Option<u64>,
}

/// Longest accepted check interval: one week.
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 5,
            initial_delay_secs: 10,
            pacing_millis: 2000,
            request_timeout_secs: 30,
            check_timeout_secs: None,
        }
    }
}

impl CheckerConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        let minutes = self.interval_minutes.min(MAX_INTERVAL_MINUTES);
        Duration::from_secs(minutes.saturating_mul(60))
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn settings(&self) -> CheckerSettings {
        CheckerSettings {
            interval: self.interval(),
            initial_delay: Duration::from_secs(self.initial_delay_secs),
            pacing: Duration::from_millis(self.pacing_millis),
            check_timeout: self.check_timeout_secs.map(Duration::from_secs),
        }
    }
}
