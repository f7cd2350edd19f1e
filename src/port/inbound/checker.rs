//! Check control port for front ends.
//!
//! Lets the dashboard and the bot ask for an immediate check cycle without
//! depending on the concrete orchestrator.

/// Acknowledgement returned by a check request.
///
/// The caller only learns whether a cycle was started, never its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckRequest {
    /// A new cycle was spawned in the background.
    Started,
    /// A cycle is already running; the request was dropped, not queued.
    AlreadyRunning,
}

impl CheckRequest {
    /// Message shown to whoever asked for the check.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Started => "Stock check initiated",
            Self::AlreadyRunning => "Stock check already running",
        }
    }
}

/// On-demand control over the stock check cycle.
pub trait CheckControl: Send + Sync {
    /// Start a cycle now unless one is already running. Does not wait for it.
    fn force_check(&self) -> CheckRequest;

    /// True while a cycle is in progress.
    fn is_running(&self) -> bool;
}
