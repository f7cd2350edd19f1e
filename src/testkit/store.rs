//! [`ProductStore`] wrapper with switchable failures.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::adapter::outbound::memory::MemoryProductStore;
use crate::domain::{Observation, Product, ProductUrl, TrackerStats, UserId};
use crate::error::{Error, Result};
use crate::port::ProductStore;

/// In-memory store that can be told to fail listing, writes, subscriber
/// reads or new subscriptions.
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryProductStore,
    fail_list: AtomicBool,
    fail_subscribe: AtomicBool,
    fail_writes: Mutex<HashSet<ProductUrl>>,
    fail_subscribers: Mutex<HashSet<ProductUrl>>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `list_products` fail until switched off.
    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Make `write_observation` fail for `url`.
    pub fn fail_writes_for(&self, url: ProductUrl) {
        self.fail_writes.lock().insert(url);
    }

    /// Make `subscribers` fail for `url`.
    pub fn fail_subscribers_for(&self, url: ProductUrl) {
        self.fail_subscribers.lock().insert(url);
    }

    /// Make `subscribe` fail until switched off.
    pub fn set_fail_subscribe(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::SeqCst);
    }

    fn injected(what: &str) -> Error {
        Error::Database(format!("injected {what} failure"))
    }
}

#[async_trait]
impl ProductStore for FaultyStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Self::injected("list"));
        }
        self.inner.list_products().await
    }

    async fn get_product(&self, url: &ProductUrl) -> Result<Option<Product>> {
        self.inner.get_product(url).await
    }

    async fn upsert_product(&self, product: &Product) -> Result<()> {
        self.inner.upsert_product(product).await
    }

    async fn write_observation(
        &self,
        url: &ProductUrl,
        observation: &Observation,
        checked_at: DateTime<Utc>,
    ) -> Result<bool> {
        if self.fail_writes.lock().contains(url) {
            return Err(Self::injected("write"));
        }
        self.inner
            .write_observation(url, observation, checked_at)
            .await
    }

    async fn remove_product(&self, url: &ProductUrl) -> Result<bool> {
        self.inner.remove_product(url).await
    }

    async fn subscribe(&self, user: &UserId, url: &ProductUrl) -> Result<bool> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(Self::injected("subscribe"));
        }
        self.inner.subscribe(user, url).await
    }

    async fn unsubscribe(&self, user: &UserId, url: &ProductUrl) -> Result<bool> {
        self.inner.unsubscribe(user, url).await
    }

    async fn is_subscribed(&self, user: &UserId, url: &ProductUrl) -> Result<bool> {
        self.inner.is_subscribed(user, url).await
    }

    async fn subscribers(&self, url: &ProductUrl) -> Result<Vec<UserId>> {
        if self.fail_subscribers.lock().contains(url) {
            return Err(Self::injected("subscribers"));
        }
        self.inner.subscribers(url).await
    }

    async fn subscriber_count(&self, url: &ProductUrl) -> Result<usize> {
        self.inner.subscriber_count(url).await
    }

    async fn user_products(&self, user: &UserId) -> Result<Vec<Product>> {
        self.inner.user_products(user).await
    }

    async fn stats(&self) -> Result<TrackerStats> {
        self.inner.stats().await
    }
}
