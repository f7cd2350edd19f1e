//! Notifier port for stock status changes.
//!
//! This module defines the trait for telling subscribers that a product
//! changed status, and the per-recipient outcome type it reports back.

use async_trait::async_trait;
use tracing::info;

use crate::domain::{Product, StockStatus, UserId};

/// A product moved from one status to another between two checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// The product record after the new observation was written.
    pub product: Product,
    /// Status stored before the check.
    pub old_status: StockStatus,
    /// Status observed by the check.
    pub new_status: StockStatus,
}

impl StatusChange {
    /// True when the product became purchasable.
    #[must_use]
    pub fn is_restock(&self) -> bool {
        self.new_status == StockStatus::InStock
    }
}

/// Delivery result for a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub recipient: UserId,
    pub delivered: bool,
    /// Failure reason when `delivered` is false.
    pub error: Option<String>,
}

impl DeliveryOutcome {
    #[must_use]
    pub fn delivered(recipient: UserId) -> Self {
        Self {
            recipient,
            delivered: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(recipient: UserId, error: impl Into<String>) -> Self {
        Self {
            recipient,
            delivered: false,
            error: Some(error.into()),
        }
    }
}

/// Trait for notification backends.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - A failure for one recipient must not stop delivery to the others
/// - `notify` never fails as a whole; it reports one outcome per recipient
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a status change to every recipient.
    async fn notify(&self, recipients: &[UserId], change: &StatusChange) -> Vec<DeliveryOutcome>;
}

/// A logging notifier that reports changes via tracing.
///
/// Used when no chat backend is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, recipients: &[UserId], change: &StatusChange) -> Vec<DeliveryOutcome> {
        info!(
            url = %change.product.url,
            name = %change.product.name,
            old = %change.old_status,
            new = %change.new_status,
            recipients = recipients.len(),
            "Stock status changed"
        );
        recipients
            .iter()
            .cloned()
            .map(DeliveryOutcome::delivered)
            .collect()
    }
}
