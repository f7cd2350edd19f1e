//! SQLite store contract tests against a throwaway database file.

use std::sync::Arc;

use chrono::{Duration, Utc};
use stockwatch::domain::{Observation, Product, StockStatus};
use stockwatch::infrastructure::bootstrap::open_store;
use stockwatch::port::ProductStore;
use stockwatch::testkit::domain::{product, url, user};
use tempfile::TempDir;

fn temp_store() -> (TempDir, String, Arc<dyn ProductStore>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("stock.db");
    let path = path.to_str().unwrap().to_string();
    let store = open_store(&path).unwrap();
    (dir, path, store)
}

#[tokio::test]
async fn products_survive_reopening() {
    let (_dir, path, store) = temp_store();
    store
        .upsert_product(&product("lassi", StockStatus::InStock))
        .await
        .unwrap();
    store.subscribe(&user(1), &url("lassi")).await.unwrap();
    drop(store);

    let reopened = open_store(&path).unwrap();
    let stored = reopened.get_product(&url("lassi")).await.unwrap().unwrap();
    assert_eq!(stored.status, StockStatus::InStock);
    assert_eq!(stored.name, "lassi");
    assert_eq!(reopened.subscribers(&url("lassi")).await.unwrap(), vec![user(1)]);
}

#[tokio::test]
async fn timestamps_round_trip() {
    let (_dir, _path, store) = temp_store();
    let original = product("lassi", StockStatus::OutOfStock);
    store.upsert_product(&original).await.unwrap();

    let stored = store.get_product(&url("lassi")).await.unwrap().unwrap();
    assert_eq!(stored.created_at, original.created_at);
    assert_eq!(stored.last_checked, original.last_checked);
    assert_eq!(stored.image_url, None);
}

#[tokio::test]
async fn upsert_keeps_created_at() {
    let (_dir, _path, store) = temp_store();
    let first = product("lassi", StockStatus::InStock);
    store.upsert_product(&first).await.unwrap();

    let later = first.created_at + Duration::hours(2);
    let observation = Observation::new(StockStatus::OutOfStock, "Amul Lassi")
        .with_image("https://shop.amul.com/img/lassi.png");
    let second = Product::from_observation(url("lassi"), &observation, later);
    store.upsert_product(&second).await.unwrap();

    let stored = store.get_product(&url("lassi")).await.unwrap().unwrap();
    assert_eq!(stored.created_at, first.created_at);
    assert_eq!(stored.status, StockStatus::OutOfStock);
    assert_eq!(stored.name, "Amul Lassi");
    assert_eq!(
        stored.image_url.as_deref(),
        Some("https://shop.amul.com/img/lassi.png")
    );
}

#[tokio::test]
async fn write_observation_never_recreates_a_product() {
    let (_dir, _path, store) = temp_store();
    let observation = Observation::new(StockStatus::InStock, "Lassi");

    let written = store
        .write_observation(&url("gone"), &observation, Utc::now())
        .await
        .unwrap();

    assert!(!written);
    assert!(store.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn write_observation_keeps_name_when_page_has_none() {
    let (_dir, _path, store) = temp_store();
    store
        .upsert_product(&product("lassi", StockStatus::InStock))
        .await
        .unwrap();
    let checked_at = Utc::now() + Duration::minutes(5);

    let written = store
        .write_observation(
            &url("lassi"),
            &Observation::new(StockStatus::OutOfStock, ""),
            checked_at,
        )
        .await
        .unwrap();

    assert!(written);
    let stored = store.get_product(&url("lassi")).await.unwrap().unwrap();
    assert_eq!(stored.status, StockStatus::OutOfStock);
    assert_eq!(stored.name, "lassi");
    assert_eq!(stored.last_checked, Some(checked_at));
}

#[tokio::test]
async fn subscribe_needs_product_and_is_idempotent() {
    let (_dir, _path, store) = temp_store();
    assert!(store.subscribe(&user(1), &url("lassi")).await.is_err());

    store
        .upsert_product(&product("lassi", StockStatus::InStock))
        .await
        .unwrap();
    assert!(store.subscribe(&user(1), &url("lassi")).await.unwrap());
    assert!(!store.subscribe(&user(1), &url("lassi")).await.unwrap());
    assert_eq!(store.subscriber_count(&url("lassi")).await.unwrap(), 1);
    assert!(store.is_subscribed(&user(1), &url("lassi")).await.unwrap());
}

#[tokio::test]
async fn last_unsubscribe_deletes_product() {
    let (_dir, _path, store) = temp_store();
    store
        .upsert_product(&product("lassi", StockStatus::InStock))
        .await
        .unwrap();
    store.subscribe(&user(1), &url("lassi")).await.unwrap();
    store.subscribe(&user(2), &url("lassi")).await.unwrap();

    assert!(store.unsubscribe(&user(1), &url("lassi")).await.unwrap());
    assert!(store.get_product(&url("lassi")).await.unwrap().is_some());
    assert!(!store.unsubscribe(&user(1), &url("lassi")).await.unwrap());

    assert!(store.unsubscribe(&user(2), &url("lassi")).await.unwrap());
    assert!(store.get_product(&url("lassi")).await.unwrap().is_none());
}

#[tokio::test]
async fn remove_product_clears_subscriptions() {
    let (_dir, _path, store) = temp_store();
    store
        .upsert_product(&product("lassi", StockStatus::InStock))
        .await
        .unwrap();
    store.subscribe(&user(1), &url("lassi")).await.unwrap();

    assert!(store.remove_product(&url("lassi")).await.unwrap());
    assert!(store.user_products(&user(1)).await.unwrap().is_empty());
    assert!(!store.is_subscribed(&user(1), &url("lassi")).await.unwrap());
    assert!(!store.remove_product(&url("lassi")).await.unwrap());
}

#[tokio::test]
async fn listings_are_ordered() {
    let (_dir, _path, store) = temp_store();
    for slug in ["c", "a", "b"] {
        store
            .upsert_product(&product(slug, StockStatus::InStock))
            .await
            .unwrap();
        store.subscribe(&user(9), &url(slug)).await.unwrap();
    }
    store.subscribe(&user(3), &url("a")).await.unwrap();

    let listed: Vec<_> = store
        .list_products()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.url)
        .collect();
    assert_eq!(listed, vec![url("a"), url("b"), url("c")]);

    let mine: Vec<_> = store
        .user_products(&user(9))
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.url)
        .collect();
    assert_eq!(mine, vec![url("a"), url("b"), url("c")]);

    assert_eq!(
        store.subscribers(&url("a")).await.unwrap(),
        vec![user(3), user(9)]
    );
}

#[tokio::test]
async fn stats_count_statuses_and_distinct_users() {
    let (_dir, _path, store) = temp_store();
    store
        .upsert_product(&product("a", StockStatus::InStock))
        .await
        .unwrap();
    store
        .upsert_product(&product("b", StockStatus::OutOfStock))
        .await
        .unwrap();
    store
        .upsert_product(&product("c", StockStatus::Unknown))
        .await
        .unwrap();
    store.subscribe(&user(1), &url("a")).await.unwrap();
    store.subscribe(&user(1), &url("b")).await.unwrap();
    store.subscribe(&user(2), &url("c")).await.unwrap();

    let stats = store.stats().await.unwrap();

    assert_eq!(stats.total_products, 3);
    assert_eq!(stats.total_subscribers, 2);
    assert_eq!(stats.in_stock, 1);
    assert_eq!(stats.out_of_stock, 1);
}

#[tokio::test]
async fn in_memory_database_uses_memory_store() {
    let store = open_store(":memory:").unwrap();
    store
        .upsert_product(&product("lassi", StockStatus::InStock))
        .await
        .unwrap();
    assert_eq!(store.stats().await.unwrap().total_products, 1);
}
