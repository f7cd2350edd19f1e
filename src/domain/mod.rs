//! Domain types: products, stock status, observations and identifiers.
//!
//! Nothing in this module performs I/O.

pub mod error;
pub mod id;
pub mod product;

pub use error::DomainError;
pub use id::{ProductUrl, UrlRules, UserId};
pub use product::{Observation, Product, StockStatus, TrackerStats, UNKNOWN_PRODUCT_NAME};
