//! Notifier adapters.

#[cfg(feature = "telegram")]
pub mod telegram;
