//! Telegram notification and command handling.
//!
//! Sends stock alerts to subscribers and serves the chat commands users
//! track products with.

mod command;
mod format;

pub mod control;
pub mod notifier;

pub use control::TelegramControl;
pub use notifier::{spawn_command_worker, Delivery, TelegramConfig, TelegramNotifier};
