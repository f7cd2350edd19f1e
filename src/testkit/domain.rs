//! Builders for domain values used across tests.

use chrono::Utc;

use crate::domain::{Observation, Product, ProductUrl, StockStatus, UrlRules, UserId};

/// Host used by every test URL.
pub const HOST: &str = "shop.amul.com";

/// Rules matching [`product_url`].
pub fn rules() -> UrlRules {
    UrlRules::new(HOST, "/product/")
}

/// Raw product page URL for a slug.
pub fn product_url(slug: &str) -> String {
    format!("https://{HOST}/en/product/{slug}")
}

/// Normalized [`ProductUrl`] for a slug.
pub fn url(slug: &str) -> ProductUrl {
    ProductUrl::from_stored(product_url(slug))
}

/// A [`UserId`] from a chat id.
pub fn user(id: i64) -> UserId {
    UserId::from(id)
}

/// An observation with a name and no image.
pub fn observation(status: StockStatus, name: &str) -> Observation {
    Observation::new(status, name)
}

/// A stored product with the given status, checked now.
pub fn product(slug: &str, status: StockStatus) -> Product {
    Product::from_observation(url(slug), &Observation::new(status, slug), Utc::now())
}
