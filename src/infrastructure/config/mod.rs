//! Infrastructure configuration modules.

pub mod checker;
pub mod logging;
pub mod settings;
pub mod source;
pub mod telegram;
pub mod web;

pub use settings::Config;
