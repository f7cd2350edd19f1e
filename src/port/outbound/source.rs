//! Stock source port: where observations come from.

use async_trait::async_trait;

use crate::domain::{Observation, ProductUrl};
use crate::error::SourceError;

/// Queries the current availability of a product page.
///
/// Implementations must be idempotent and free of side effects on the shop.
/// A page that reports the product as sold out is a successful
/// [`Observation`]; only transport and parse failures are errors. Each query
/// is expected to bound itself with its own timeout.
#[async_trait]
pub trait StockSource: Send + Sync {
    /// Fetch one observation for the given product.
    async fn query(&self, url: &ProductUrl) -> Result<Observation, SourceError>;
}
