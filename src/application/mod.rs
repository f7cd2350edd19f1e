//! Application services.
//!
//! - [`orchestrator`] - Periodic and on-demand stock check cycles
//! - [`tracking`] - Track/untrack use cases for the front ends

pub mod orchestrator;
pub mod tracking;

pub use orchestrator::{CheckerSettings, CycleReport, CycleState, Orchestrator, PeriodicHandle};
pub use tracking::{ProductSummary, TrackOutcome, TrackingService, UntrackOutcome};
