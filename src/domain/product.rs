//! Tracked products, their stock status and point-in-time observations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::ProductUrl;

/// Name stored for a product whose page did not yield one.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// Availability of a product as last seen on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    /// No successful observation yet, or the page showed no known indicator.
    #[default]
    Unknown,
}

impl StockStatus {
    /// Stable identifier used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::OutOfStock => "out_of_stock",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable label with an icon, for chat and CLI output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "✅ In Stock",
            Self::OutOfStock => "❌ Out of Stock",
            Self::Unknown => "❓ Unknown",
        }
    }

    /// Compact status marker for lists.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::InStock => "🟢",
            Self::OutOfStock => "🔴",
            Self::Unknown => "⚪",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_stock" => Ok(Self::InStock),
            "out_of_stock" => Ok(Self::OutOfStock),
            "unknown" => Ok(Self::Unknown),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// Result of one successful stock query for a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub status: StockStatus,
    /// Display name found on the page; empty when none was found.
    pub name: String,
    pub image_url: Option<String>,
}

impl Observation {
    pub fn new(status: StockStatus, name: impl Into<String>) -> Self {
        Self {
            status,
            name: name.into(),
            image_url: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// A product whose availability is being monitored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub url: ProductUrl,
    pub name: String,
    pub status: StockStatus,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_checked: Option<DateTime<Utc>>,
}

impl Product {
    /// Build a new product record from its first observation.
    #[must_use]
    pub fn from_observation(url: ProductUrl, observation: &Observation, now: DateTime<Utc>) -> Self {
        Self {
            url,
            name: display_name(&observation.name, UNKNOWN_PRODUCT_NAME).to_string(),
            status: observation.status,
            image_url: observation.image_url.clone(),
            created_at: now,
            last_checked: Some(now),
        }
    }

    /// Fold a fresh observation into this record.
    ///
    /// The status is always replaced. An empty name or missing image keeps
    /// the stored value, so a partially rendered page does not wipe them.
    pub fn apply(&mut self, observation: &Observation, checked_at: DateTime<Utc>) {
        self.status = observation.status;
        self.name = display_name(&observation.name, &self.name).to_string();
        if observation.image_url.is_some() {
            self.image_url.clone_from(&observation.image_url);
        }
        self.last_checked = Some(checked_at);
    }
}

fn display_name<'a>(observed: &'a str, fallback: &'a str) -> &'a str {
    let observed = observed.trim();
    if observed.is_empty() {
        fallback
    } else {
        observed
    }
}

/// Aggregate counters shown on the dashboard and at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerStats {
    pub total_products: usize,
    pub total_subscribers: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> ProductUrl {
        ProductUrl::from_stored("https://shop.amul.com/en/product/lassi")
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [StockStatus::InStock, StockStatus::OutOfStock, StockStatus::Unknown] {
            assert_eq!(status.as_str().parse::<StockStatus>().unwrap(), status);
        }
        assert_eq!(
            "error".parse::<StockStatus>(),
            Err(DomainError::UnknownStatus("error".into()))
        );
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&StockStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"out_of_stock\"");
    }

    #[test]
    fn from_observation_uses_placeholder_name() {
        let obs = Observation::new(StockStatus::InStock, "  ");
        let product = Product::from_observation(url(), &obs, Utc::now());
        assert_eq!(product.name, UNKNOWN_PRODUCT_NAME);
        assert!(product.last_checked.is_some());
    }

    #[test]
    fn apply_keeps_name_and_image_when_missing() {
        let now = Utc::now();
        let first = Observation::new(StockStatus::InStock, "Amul Lassi").with_image("https://img/1.png");
        let mut product = Product::from_observation(url(), &first, now);

        let later = now + chrono::Duration::minutes(5);
        product.apply(&Observation::new(StockStatus::OutOfStock, ""), later);

        assert_eq!(product.status, StockStatus::OutOfStock);
        assert_eq!(product.name, "Amul Lassi");
        assert_eq!(product.image_url.as_deref(), Some("https://img/1.png"));
        assert_eq!(product.last_checked, Some(later));
    }
}
