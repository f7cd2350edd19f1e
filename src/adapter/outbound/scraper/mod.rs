//! Stock source that reads the shop's product pages over HTTP.

mod client;
pub mod page;

pub use client::{HttpSourceConfig, HttpStockSource};
