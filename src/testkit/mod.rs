//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] - [`ScriptedSource`](source::ScriptedSource), a stock source
//!   with per-URL answers, call counting and a gate for holding queries open.
//! - [`notifier`] - [`RecordingNotifier`](notifier::RecordingNotifier), which
//!   keeps every status change it was asked to deliver.
//! - [`store`] - [`FaultyStore`](store::FaultyStore), an in-memory store with
//!   switchable failures.
//! - [`domain`] - Builders for URLs, users and products.

pub mod domain;
pub mod notifier;
pub mod source;
pub mod store;
