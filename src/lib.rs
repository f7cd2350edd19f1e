//! stockwatch - product stock tracking with Telegram alerts.
//!
//! Users subscribe to product pages on a single shop. A background
//! orchestrator re-checks every tracked product on a fixed interval, stores
//! what it sees and tells subscribers when a product goes in or out of stock.
//!
//! # Architecture
//!
//! The crate is laid out as ports and adapters:
//!
//! - [`domain`] - Products, stock status, observations and identifiers
//! - [`port`] - Traits for the stock source, product store and notifier
//! - [`application`] - The check orchestrator and the tracking service
//! - [`adapter`] - Page scraper, SQLite and in-memory stores, Telegram,
//!   the HTTP dashboard and the CLI
//! - [`infrastructure`] - Configuration, logging and process wiring
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Telegram alerts and bot commands
//! - `testkit` - Scripted collaborators for integration tests
//!
//! # Example
//!
//! ```no_run
//! use stockwatch::infrastructure::bootstrap::{self, RunOptions};
//! use stockwatch::infrastructure::config::Config;
//!
//! # async fn example() -> stockwatch::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! config.init_logging();
//! bootstrap::run(config, RunOptions::default()).await
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
