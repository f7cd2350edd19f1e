//! In-memory product store.
//!
//! Used for `database = ":memory:"` and throughout the tests. Both maps sit
//! behind one lock so every call sees and leaves a consistent pair.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::{Observation, Product, ProductUrl, StockStatus, TrackerStats, UserId};
use crate::error::{Error, Result};
use crate::port::ProductStore;

#[derive(Debug, Default)]
struct Inner {
    products: BTreeMap<ProductUrl, Product>,
    subscriptions: BTreeMap<ProductUrl, BTreeSet<UserId>>,
}

/// Product store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    inner: RwLock<Inner>,
}

impl MemoryProductStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.inner.read().products.values().cloned().collect())
    }

    async fn get_product(&self, url: &ProductUrl) -> Result<Option<Product>> {
        Ok(self.inner.read().products.get(url).cloned())
    }

    async fn upsert_product(&self, product: &Product) -> Result<()> {
        let mut inner = self.inner.write();
        match inner.products.get_mut(&product.url) {
            Some(existing) => {
                let created_at = existing.created_at;
                *existing = product.clone();
                existing.created_at = created_at;
            }
            None => {
                inner.products.insert(product.url.clone(), product.clone());
            }
        }
        Ok(())
    }

    async fn write_observation(
        &self,
        url: &ProductUrl,
        observation: &Observation,
        checked_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut inner = self.inner.write();
        let Some(product) = inner.products.get_mut(url) else {
            return Ok(false);
        };
        product.apply(observation, checked_at);
        Ok(true)
    }

    async fn remove_product(&self, url: &ProductUrl) -> Result<bool> {
        let mut inner = self.inner.write();
        inner.subscriptions.remove(url);
        Ok(inner.products.remove(url).is_some())
    }

    async fn subscribe(&self, user: &UserId, url: &ProductUrl) -> Result<bool> {
        let mut inner = self.inner.write();
        if !inner.products.contains_key(url) {
            return Err(Error::Database(format!("product not tracked: {url}")));
        }
        Ok(inner
            .subscriptions
            .entry(url.clone())
            .or_default()
            .insert(user.clone()))
    }

    async fn unsubscribe(&self, user: &UserId, url: &ProductUrl) -> Result<bool> {
        let mut inner = self.inner.write();
        let Some(users) = inner.subscriptions.get_mut(url) else {
            return Ok(false);
        };
        let removed = users.remove(user);
        if users.is_empty() {
            inner.subscriptions.remove(url);
            if removed {
                inner.products.remove(url);
            }
        }
        Ok(removed)
    }

    async fn is_subscribed(&self, user: &UserId, url: &ProductUrl) -> Result<bool> {
        Ok(self
            .inner
            .read()
            .subscriptions
            .get(url)
            .is_some_and(|users| users.contains(user)))
    }

    async fn subscribers(&self, url: &ProductUrl) -> Result<Vec<UserId>> {
        Ok(self
            .inner
            .read()
            .subscriptions
            .get(url)
            .map(|users| users.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn subscriber_count(&self, url: &ProductUrl) -> Result<usize> {
        Ok(self
            .inner
            .read()
            .subscriptions
            .get(url)
            .map_or(0, BTreeSet::len))
    }

    async fn user_products(&self, user: &UserId) -> Result<Vec<Product>> {
        let inner = self.inner.read();
        Ok(inner
            .subscriptions
            .iter()
            .filter(|(_, users)| users.contains(user))
            .filter_map(|(url, _)| inner.products.get(url).cloned())
            .collect())
    }

    async fn stats(&self) -> Result<TrackerStats> {
        let inner = self.inner.read();
        let distinct: BTreeSet<&UserId> = inner.subscriptions.values().flatten().collect();
        let count = |status| {
            inner
                .products
                .values()
                .filter(|p| p.status == status)
                .count()
        };
        Ok(TrackerStats {
            total_products: inner.products.len(),
            total_subscribers: distinct.len(),
            in_stock: count(StockStatus::InStock),
            out_of_stock: count(StockStatus::OutOfStock),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(slug: &str) -> ProductUrl {
        ProductUrl::from_stored(format!("https://shop.amul.com/en/product/{slug}"))
    }

    fn user(id: &str) -> UserId {
        UserId::try_new(id).unwrap()
    }

    async fn seeded(store: &MemoryProductStore, slug: &str) -> ProductUrl {
        let url = url(slug);
        let observation = Observation::new(StockStatus::InStock, "Amul Lassi");
        store
            .upsert_product(&Product::from_observation(url.clone(), &observation, Utc::now()))
            .await
            .unwrap();
        url
    }

    #[tokio::test]
    async fn subscribe_is_idempotent_and_mirrored() {
        let store = MemoryProductStore::new();
        let url = seeded(&store, "lassi").await;

        assert!(store.subscribe(&user("1"), &url).await.unwrap());
        assert!(!store.subscribe(&user("1"), &url).await.unwrap());

        assert_eq!(store.subscribers(&url).await.unwrap(), vec![user("1")]);
        let products = store.user_products(&user("1")).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].url, url);
    }

    #[tokio::test]
    async fn subscribe_requires_stored_product() {
        let store = MemoryProductStore::new();
        assert!(store.subscribe(&user("1"), &url("ghost")).await.is_err());
    }

    #[tokio::test]
    async fn last_unsubscribe_removes_product() {
        let store = MemoryProductStore::new();
        let url = seeded(&store, "lassi").await;
        store.subscribe(&user("1"), &url).await.unwrap();
        store.subscribe(&user("2"), &url).await.unwrap();

        assert!(store.unsubscribe(&user("1"), &url).await.unwrap());
        assert!(store.get_product(&url).await.unwrap().is_some());

        assert!(store.unsubscribe(&user("2"), &url).await.unwrap());
        assert!(store.get_product(&url).await.unwrap().is_none());
        assert!(store.subscribers(&url).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unsubscribe_of_stranger_keeps_product() {
        let store = MemoryProductStore::new();
        let url = seeded(&store, "lassi").await;

        assert!(!store.unsubscribe(&user("9"), &url).await.unwrap());
        assert!(store.get_product(&url).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn write_observation_skips_missing_product() {
        let store = MemoryProductStore::new();
        let observation = Observation::new(StockStatus::OutOfStock, "Amul Lassi");

        let written = store
            .write_observation(&url("gone"), &observation, Utc::now())
            .await
            .unwrap();

        assert!(!written);
        assert!(store.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_preserves_created_at() {
        let store = MemoryProductStore::new();
        let url = seeded(&store, "lassi").await;
        let created = store.get_product(&url).await.unwrap().unwrap().created_at;

        let later = created + chrono::Duration::hours(1);
        let observation = Observation::new(StockStatus::OutOfStock, "Amul Lassi 200ml");
        store
            .upsert_product(&Product::from_observation(url.clone(), &observation, later))
            .await
            .unwrap();

        let stored = store.get_product(&url).await.unwrap().unwrap();
        assert_eq!(stored.created_at, created);
        assert_eq!(stored.status, StockStatus::OutOfStock);
        assert_eq!(stored.name, "Amul Lassi 200ml");
    }

    #[tokio::test]
    async fn stats_count_distinct_subscribers() {
        let store = MemoryProductStore::new();
        let a = seeded(&store, "a").await;
        let b = seeded(&store, "b").await;
        store.subscribe(&user("1"), &a).await.unwrap();
        store.subscribe(&user("1"), &b).await.unwrap();
        store.subscribe(&user("2"), &b).await.unwrap();
        store
            .write_observation(&b, &Observation::new(StockStatus::OutOfStock, ""), Utc::now())
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_subscribers, 2);
        assert_eq!(stats.in_stock, 1);
        assert_eq!(stats.out_of_stock, 1);
    }
}
