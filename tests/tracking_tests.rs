//! Track/untrack flows shared by the bot and the dashboard.

use std::sync::Arc;

use stockwatch::adapter::outbound::memory::MemoryProductStore;
use stockwatch::application::{TrackOutcome, TrackingService, UntrackOutcome};
use stockwatch::domain::{StockStatus, UNKNOWN_PRODUCT_NAME};
use stockwatch::error::Error;
use stockwatch::port::ProductStore;
use stockwatch::testkit::domain::{observation, product_url, rules, url, user};
use stockwatch::testkit::source::ScriptedSource;
use stockwatch::testkit::store::FaultyStore;

fn service() -> (Arc<ScriptedSource>, Arc<MemoryProductStore>, TrackingService) {
    let source = Arc::new(ScriptedSource::new());
    let store = Arc::new(MemoryProductStore::new());
    let tracking = TrackingService::new(source.clone(), store.clone(), rules());
    (source, store, tracking)
}

#[tokio::test]
async fn track_stores_product_and_subscribes() {
    let (source, store, tracking) = service();
    source.set(
        &product_url("lassi"),
        observation(StockStatus::InStock, "Amul Lassi"),
    );

    let outcome = tracking
        .track(&user(1), &product_url("lassi"))
        .await
        .unwrap();

    let TrackOutcome::Tracking(product) = outcome else {
        panic!("expected a new subscription");
    };
    assert_eq!(product.name, "Amul Lassi");
    assert_eq!(product.status, StockStatus::InStock);
    assert!(store.is_subscribed(&user(1), &url("lassi")).await.unwrap());
}

#[tokio::test]
async fn track_normalizes_the_link() {
    let (source, store, tracking) = service();
    source.set(&product_url("lassi"), observation(StockStatus::InStock, "Lassi"));

    let messy = "https://www.shop.amul.com/en/product/lassi/?utm_source=share#top";
    tracking.track(&user(1), messy).await.unwrap();

    let products = store.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].url, url("lassi"));
}

#[tokio::test]
async fn tracking_twice_reports_already_tracking() {
    let (source, _store, tracking) = service();
    source.set(&product_url("lassi"), observation(StockStatus::InStock, "Lassi"));

    tracking.track(&user(1), &product_url("lassi")).await.unwrap();
    let second = tracking.track(&user(1), &product_url("lassi")).await.unwrap();

    assert_eq!(second, TrackOutcome::AlreadyTracking(url("lassi")));
    assert_eq!(source.started(), 1);
}

#[tokio::test]
async fn track_rejects_foreign_host_without_querying() {
    let (source, store, tracking) = service();

    let err = tracking
        .track(&user(1), "https://example.com/en/product/lassi")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Domain(_)));
    assert_eq!(source.started(), 0);
    assert!(store.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_first_query_stores_nothing() {
    let (source, store, tracking) = service();
    source.fail(&product_url("lassi"), 500);

    let err = tracking
        .track(&user(1), &product_url("lassi"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Source(_)));
    assert!(store.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn nameless_page_gets_placeholder_name() {
    let (source, _store, tracking) = service();
    source.set(&product_url("mystery"), observation(StockStatus::Unknown, "  "));

    let TrackOutcome::Tracking(product) = tracking
        .track(&user(1), &product_url("mystery"))
        .await
        .unwrap()
    else {
        panic!("expected a new subscription");
    };
    assert_eq!(product.name, UNKNOWN_PRODUCT_NAME);
}

#[tokio::test]
async fn last_untrack_removes_product() {
    let (source, store, tracking) = service();
    source.set(&product_url("lassi"), observation(StockStatus::InStock, "Lassi"));
    tracking.track(&user(1), &product_url("lassi")).await.unwrap();
    tracking.track(&user(2), &product_url("lassi")).await.unwrap();

    let first = tracking.untrack(&user(1), &product_url("lassi")).await.unwrap();
    assert_eq!(
        first,
        UntrackOutcome::Stopped {
            name: "Lassi".into(),
            product_removed: false
        }
    );

    let last = tracking.untrack(&user(2), &product_url("lassi")).await.unwrap();
    assert_eq!(
        last,
        UntrackOutcome::Stopped {
            name: "Lassi".into(),
            product_removed: true
        }
    );
    assert!(store.get_product(&url("lassi")).await.unwrap().is_none());
}

#[tokio::test]
async fn untrack_without_subscription_is_not_tracking() {
    let (_source, _store, tracking) = service();
    let outcome = tracking.untrack(&user(1), &product_url("lassi")).await.unwrap();
    assert_eq!(outcome, UntrackOutcome::NotTracking);
}

#[tokio::test]
async fn list_returns_only_the_users_products() {
    let (source, _store, tracking) = service();
    for slug in ["a", "b"] {
        source.set(&product_url(slug), observation(StockStatus::InStock, slug));
    }
    tracking.track(&user(1), &product_url("a")).await.unwrap();
    tracking.track(&user(2), &product_url("b")).await.unwrap();

    let mine = tracking.list(&user(1)).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].url, url("a"));
    assert!(tracking.list(&user(3)).await.unwrap().is_empty());
}

#[tokio::test]
async fn status_queries_without_storing() {
    let (source, store, tracking) = service();
    source.set(
        &product_url("lassi"),
        observation(StockStatus::OutOfStock, "Lassi"),
    );

    let (checked, found) = tracking.status(&product_url("lassi")).await.unwrap();

    assert_eq!(checked, url("lassi"));
    assert_eq!(found.status, StockStatus::OutOfStock);
    assert!(store.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn dashboard_add_without_user_keeps_product_unsubscribed() {
    let (source, store, tracking) = service();
    source.set(&product_url("lassi"), observation(StockStatus::InStock, "Lassi"));

    tracking.add_product(&product_url("lassi"), None).await.unwrap();

    assert!(store.get_product(&url("lassi")).await.unwrap().is_some());
    assert_eq!(store.subscriber_count(&url("lassi")).await.unwrap(), 0);
}

#[tokio::test]
async fn admin_remove_drops_every_subscription() {
    let (source, store, tracking) = service();
    source.set(&product_url("lassi"), observation(StockStatus::InStock, "Lassi"));
    tracking.track(&user(1), &product_url("lassi")).await.unwrap();
    tracking.track(&user(2), &product_url("lassi")).await.unwrap();

    assert!(tracking.remove_product(&product_url("lassi"), None).await.unwrap());

    assert!(store.get_product(&url("lassi")).await.unwrap().is_none());
    assert!(tracking.list(&user(1)).await.unwrap().is_empty());
    assert!(!tracking.remove_product(&product_url("lassi"), None).await.unwrap());
}

#[tokio::test]
async fn summaries_carry_subscribers() {
    let (source, _store, tracking) = service();
    source.set(&product_url("lassi"), observation(StockStatus::InStock, "Lassi"));
    tracking.track(&user(2), &product_url("lassi")).await.unwrap();
    tracking.track(&user(1), &product_url("lassi")).await.unwrap();

    let summaries = tracking.summaries().await.unwrap();

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].subscribers, vec![user(1), user(2)]);
    let stats = tracking.stats().await.unwrap();
    assert_eq!(stats.total_products, 1);
    assert_eq!(stats.total_subscribers, 2);
    assert_eq!(stats.in_stock, 1);
}

#[tokio::test]
async fn failed_subscribe_drops_a_product_it_just_created() {
    let source = Arc::new(ScriptedSource::new());
    let store = Arc::new(FaultyStore::new());
    let tracking = TrackingService::new(source.clone(), store.clone(), rules());
    source.set(&product_url("lassi"), observation(StockStatus::InStock, "Lassi"));
    store.set_fail_subscribe(true);

    let err = tracking
        .track(&user(1), &product_url("lassi"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Database(_)));
    assert!(store.list_products().await.unwrap().is_empty());

    let err = tracking
        .add_product(&product_url("lassi"), Some(&user(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Database(_)));
    assert!(store.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_subscribe_keeps_an_existing_product() {
    let source = Arc::new(ScriptedSource::new());
    let store = Arc::new(FaultyStore::new());
    let tracking = TrackingService::new(source.clone(), store.clone(), rules());
    source.set(&product_url("lassi"), observation(StockStatus::InStock, "Lassi"));
    tracking.track(&user(1), &product_url("lassi")).await.unwrap();
    store.set_fail_subscribe(true);

    assert!(tracking.track(&user(2), &product_url("lassi")).await.is_err());

    assert!(store.get_product(&url("lassi")).await.unwrap().is_some());
    assert_eq!(store.subscribers(&url("lassi")).await.unwrap(), vec![user(1)]);
}
