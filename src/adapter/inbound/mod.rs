//! Inbound adapters: the CLI and the HTTP dashboard.

pub mod cli;
pub mod http;
