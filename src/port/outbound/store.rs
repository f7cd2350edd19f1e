//! Persistence port for products and subscriptions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Observation, Product, ProductUrl, TrackerStats, UserId};
use crate::error::Result;

/// Storage for tracked products and the user ↔ product subscription relation.
///
/// Every call is atomic on its own; callers get no multi-call transactions.
/// Implementations keep both directions of the subscription relation in
/// agreement and delete a product in the same call that removes its last
/// subscriber.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All tracked products, ordered by URL.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Look up one product.
    async fn get_product(&self, url: &ProductUrl) -> Result<Option<Product>>;

    /// Insert a product, or refresh an existing one with this record's
    /// status, name, image and check time. `created_at` of an existing row
    /// is preserved.
    async fn upsert_product(&self, product: &Product) -> Result<()>;

    /// Fold an observation into an existing product (see [`Product::apply`]).
    ///
    /// Returns `false` without writing when the product no longer exists, so
    /// a check cycle never resurrects a product whose last subscriber left.
    async fn write_observation(
        &self,
        url: &ProductUrl,
        observation: &Observation,
        checked_at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Delete a product and all of its subscriptions. Returns `true` if it existed.
    async fn remove_product(&self, url: &ProductUrl) -> Result<bool>;

    /// Subscribe a user. Returns `true` if the subscription is new.
    ///
    /// Fails when the product is not stored; upsert it first.
    async fn subscribe(&self, user: &UserId, url: &ProductUrl) -> Result<bool>;

    /// Unsubscribe a user, deleting the product if nobody is left.
    ///
    /// Returns `true` if the subscription existed.
    async fn unsubscribe(&self, user: &UserId, url: &ProductUrl) -> Result<bool>;

    async fn is_subscribed(&self, user: &UserId, url: &ProductUrl) -> Result<bool>;

    /// Current subscribers of a product, ordered by id.
    async fn subscribers(&self, url: &ProductUrl) -> Result<Vec<UserId>>;

    async fn subscriber_count(&self, url: &ProductUrl) -> Result<usize>;

    /// Products a user is subscribed to, ordered by URL.
    async fn user_products(&self, user: &UserId) -> Result<Vec<Product>>;

    async fn stats(&self) -> Result<TrackerStats>;
}
