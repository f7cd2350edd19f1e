//! Track/untrack use cases shared by the chat bot and the dashboard.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{Observation, Product, ProductUrl, TrackerStats, UrlRules, UserId};
use crate::error::Result;
use crate::port::{ProductStore, StockSource};

/// Result of asking to track a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// The user is now subscribed; carries the stored product.
    Tracking(Product),
    /// The user was already subscribed; nothing changed.
    AlreadyTracking(ProductUrl),
}

/// Result of asking to stop tracking a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntrackOutcome {
    Stopped {
        name: String,
        /// True when this was the last subscriber and the product was deleted.
        product_removed: bool,
    },
    NotTracking,
}

/// A product together with who is watching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    #[serde(flatten)]
    pub product: Product,
    pub subscribers: Vec<UserId>,
}

/// Front-end use cases over the product store and the stock source.
#[derive(Clone)]
pub struct TrackingService {
    source: Arc<dyn StockSource>,
    store: Arc<dyn ProductStore>,
    rules: UrlRules,
}

impl TrackingService {
    pub fn new(source: Arc<dyn StockSource>, store: Arc<dyn ProductStore>, rules: UrlRules) -> Self {
        Self {
            source,
            store,
            rules,
        }
    }

    #[must_use]
    pub fn rules(&self) -> &UrlRules {
        &self.rules
    }

    /// Validate and normalize a user-supplied product URL.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Domain`] for URLs outside the shop.
    pub fn parse_url(&self, raw: &str) -> Result<ProductUrl> {
        Ok(ProductUrl::parse(raw, &self.rules)?)
    }

    /// Subscribe a user to a product, checking its page first.
    ///
    /// # Errors
    ///
    /// Fails on an invalid URL, a failed page check, or a store error.
    pub async fn track(&self, user: &UserId, raw_url: &str) -> Result<TrackOutcome> {
        let url = self.parse_url(raw_url)?;
        if self.store.is_subscribed(user, &url).await? {
            return Ok(TrackOutcome::AlreadyTracking(url));
        }

        let (product, created) = self.refresh(&url).await?;
        self.subscribe_fresh(user, &url, created).await?;
        info!(user = %user, url = %url, status = %product.status, "User started tracking");

        Ok(TrackOutcome::Tracking(product))
    }

    /// Remove a user's subscription; the product goes with its last subscriber.
    ///
    /// # Errors
    ///
    /// Fails on an invalid URL or a store error.
    pub async fn untrack(&self, user: &UserId, raw_url: &str) -> Result<UntrackOutcome> {
        let url = self.parse_url(raw_url)?;
        if !self.store.is_subscribed(user, &url).await? {
            return Ok(UntrackOutcome::NotTracking);
        }

        let name = self
            .store
            .get_product(&url)
            .await?
            .map_or_else(|| crate::domain::UNKNOWN_PRODUCT_NAME.to_string(), |p| p.name);
        self.store.unsubscribe(user, &url).await?;
        let product_removed = self.store.get_product(&url).await?.is_none();
        info!(user = %user, url = %url, product_removed, "User stopped tracking");

        Ok(UntrackOutcome::Stopped {
            name,
            product_removed,
        })
    }

    /// Products a user is tracking.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub async fn list(&self, user: &UserId) -> Result<Vec<Product>> {
        self.store.user_products(user).await
    }

    /// One-off check of a product page without tracking it.
    ///
    /// # Errors
    ///
    /// Fails on an invalid URL or a failed page check.
    pub async fn status(&self, raw_url: &str) -> Result<(ProductUrl, Observation)> {
        let url = self.parse_url(raw_url)?;
        let observation = self.source.query(&url).await?;
        Ok((url, observation))
    }

    /// Dashboard add: check the page, store the product and optionally
    /// subscribe a user.
    ///
    /// # Errors
    ///
    /// Fails on an invalid URL, a failed page check, or a store error.
    pub async fn add_product(&self, raw_url: &str, user: Option<&UserId>) -> Result<Product> {
        let url = self.parse_url(raw_url)?;
        let (product, created) = self.refresh(&url).await?;
        if let Some(user) = user {
            self.subscribe_fresh(user, &url, created).await?;
        }
        info!(url = %url, subscribed = user.is_some(), "Product added from dashboard");
        Ok(product)
    }

    /// Dashboard remove: unsubscribe one user, or with no user drop the
    /// product and every subscription to it.
    ///
    /// # Errors
    ///
    /// Fails on an invalid URL or a store error.
    pub async fn remove_product(&self, raw_url: &str, user: Option<&UserId>) -> Result<bool> {
        let url = self.parse_url(raw_url)?;
        let removed = match user {
            Some(user) => self.store.unsubscribe(user, &url).await?,
            None => self.store.remove_product(&url).await?,
        };
        info!(url = %url, removed, by_user = user.is_some(), "Product removed from dashboard");
        Ok(removed)
    }

    /// Every tracked product with its subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if a store read fails.
    pub async fn summaries(&self) -> Result<Vec<ProductSummary>> {
        let products = self.store.list_products().await?;
        let mut summaries = Vec::with_capacity(products.len());
        for product in products {
            let subscribers = self.store.subscribers(&product.url).await?;
            summaries.push(ProductSummary {
                product,
                subscribers,
            });
        }
        Ok(summaries)
    }

    /// Aggregate counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub async fn stats(&self) -> Result<TrackerStats> {
        self.store.stats().await
    }

    /// Query the page and upsert the product with the fresh observation.
    /// Query the page and upsert the product. The flag is true when the
    /// product was not stored before.
    async fn refresh(&self, url: &ProductUrl) -> Result<(Product, bool)> {
        let observation = self.source.query(url).await?;
        let now = Utc::now();

        let (product, created) = match self.store.get_product(url).await? {
            Some(mut existing) => {
                existing.apply(&observation, now);
                (existing, false)
            }
            None => (Product::from_observation(url.clone(), &observation, now), true),
        };
        self.store.upsert_product(&product).await?;
        Ok((product, created))
    }

    /// Subscribe after a refresh. A product created by that refresh is
    /// removed again if the subscription cannot be stored.
    async fn subscribe_fresh(&self, user: &UserId, url: &ProductUrl, created: bool) -> Result<()> {
        let Err(e) = self.store.subscribe(user, url).await else {
            return Ok(());
        };
        if created {
            if let Err(cleanup) = self.store.remove_product(url).await {
                warn!(url = %url, error = %cleanup, "Failed to remove unsubscribed product");
            }
        }
        Err(e)
    }
}
