//! Inbound (driving) ports consumed by inbound adapters.
//!
//! Inbound ports expose application capabilities to external drivers such as
//! the HTTP dashboard and the Telegram bot.
//!
//! # Modules
//!
//! - [`checker`]: On-demand check cycle control

pub mod checker;
