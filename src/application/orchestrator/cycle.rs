//! One pass over every tracked product.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::guard::FlightGuard;
use super::{CheckerSettings, Trigger};
use crate::domain::{Observation, Product, StockStatus};
use crate::error::{Result, SourceError};
use crate::port::{Notifier, ProductStore, StatusChange, StockSource};

/// What happened to a single product during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOutcome {
    /// The source query failed; nothing was written.
    SourceFailed,
    /// Writing the observation failed.
    StoreFailed,
    /// The product was deleted while the cycle was running.
    Vanished,
    /// Status unchanged; name, image and check time refreshed.
    Unchanged,
    /// First real status after `unknown`; recorded without notifying.
    FirstObservation,
    /// Status changed and subscribers were notified.
    Changed { recipients: usize, delivered: usize },
    /// Status changed but the subscriber list could not be read.
    SubscribersFailed,
}

impl ProductOutcome {
    /// True when the observation reached the store.
    #[must_use]
    pub const fn is_updated(self) -> bool {
        matches!(
            self,
            Self::Unchanged
                | Self::FirstObservation
                | Self::Changed { .. }
                | Self::SubscribersFailed
        )
    }
}

/// Summary of a finished cycle, for logs and inline callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub checked: usize,
    pub updated: usize,
    pub failed: usize,
    pub transitions: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
}

impl CycleReport {
    fn record(&mut self, outcome: ProductOutcome) {
        self.checked += 1;
        if outcome.is_updated() {
            self.updated += 1;
        }
        match outcome {
            ProductOutcome::SourceFailed | ProductOutcome::StoreFailed => self.failed += 1,
            ProductOutcome::Changed {
                recipients,
                delivered,
            } => {
                self.transitions += 1;
                self.notifications_sent += delivered;
                self.notifications_failed += recipients.saturating_sub(delivered);
            }
            ProductOutcome::SubscribersFailed => {
                self.transitions += 1;
                self.failed += 1;
            }
            _ => {}
        }
    }
}

/// A subscriber hears about a change only when there was a real prior status.
#[must_use]
pub fn should_notify(old_status: StockStatus, new_status: StockStatus) -> bool {
    old_status != new_status && old_status != StockStatus::Unknown
}

/// Collaborators a cycle runs against.
pub(super) struct CycleContext {
    pub(super) source: Arc<dyn StockSource>,
    pub(super) store: Arc<dyn ProductStore>,
    pub(super) notifier: Arc<dyn Notifier>,
    pub(super) settings: CheckerSettings,
}

impl CycleContext {
    /// Run a full cycle while holding the single-flight guard.
    ///
    /// Only an enumeration failure is returned as an error. The guard is
    /// released when this future completes, fails or is dropped.
    pub(super) async fn run(&self, guard: FlightGuard, trigger: Trigger) -> Result<CycleReport> {
        let span = info_span!(
            "check_cycle",
            cycle_id = %Uuid::new_v4(),
            trigger = trigger.as_str()
        );

        let result = self.run_products().instrument(span.clone()).await;
        drop(guard);

        let _entered = span.enter();
        match &result {
            Ok(report) => info!(
                checked = report.checked,
                updated = report.updated,
                failed = report.failed,
                transitions = report.transitions,
                "Stock check completed"
            ),
            Err(e) => error!(error = %e, "Error during stock check"),
        }
        result
    }

    async fn run_products(&self) -> Result<CycleReport> {
        info!("Running stock check");
        let products = self.store.list_products().await?;
        let mut report = CycleReport::default();

        if products.is_empty() {
            info!("No products to check");
            return Ok(report);
        }

        info!(count = products.len(), "Checking products");
        for (index, product) in products.iter().enumerate() {
            if index > 0 && !self.settings.pacing.is_zero() {
                tokio::time::sleep(self.settings.pacing).await;
            }
            let outcome = self.check_product(product).await;
            report.record(outcome);
        }

        Ok(report)
    }

    /// Check one product against its page and fan out a status change.
    pub(super) async fn check_product(&self, product: &Product) -> ProductOutcome {
        let url = &product.url;
        let old_status = product.status;

        let observation = match self.query(product).await {
            Ok(observation) => observation,
            Err(e) => {
                warn!(url = %url, name = %product.name, error = %e, "Error checking product");
                return ProductOutcome::SourceFailed;
            }
        };

        let checked_at = Utc::now();
        match self
            .store
            .write_observation(url, &observation, checked_at)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                debug!(url = %url, "Product removed during check, skipping");
                return ProductOutcome::Vanished;
            }
            Err(e) => {
                error!(url = %url, error = %e, "Failed to store observation");
                return ProductOutcome::StoreFailed;
            }
        }

        let new_status = observation.status;
        if !should_notify(old_status, new_status) {
            if old_status == new_status {
                debug!(url = %url, status = %new_status, "Status unchanged");
                return ProductOutcome::Unchanged;
            }
            debug!(url = %url, status = %new_status, "First observation recorded");
            return ProductOutcome::FirstObservation;
        }

        info!(
            url = %url,
            name = %product.name,
            old = %old_status,
            new = %new_status,
            "Status change"
        );

        // Read fresh: subscriptions may have changed since enumeration.
        let subscribers = match self.store.subscribers(url).await {
            Ok(subscribers) => subscribers,
            Err(e) => {
                error!(url = %url, error = %e, "Failed to load subscribers");
                return ProductOutcome::SubscribersFailed;
            }
        };
        if subscribers.is_empty() {
            return ProductOutcome::Changed {
                recipients: 0,
                delivered: 0,
            };
        }

        let mut refreshed = product.clone();
        refreshed.apply(&observation, checked_at);
        let change = StatusChange {
            product: refreshed,
            old_status,
            new_status,
        };

        let outcomes = self.notifier.notify(&subscribers, &change).await;
        let mut delivered = 0;
        for outcome in &outcomes {
            if outcome.delivered {
                delivered += 1;
            } else {
                warn!(
                    url = %url,
                    recipient = %outcome.recipient,
                    error = outcome.error.as_deref().unwrap_or("unknown"),
                    "Notification failed"
                );
            }
        }

        ProductOutcome::Changed {
            recipients: subscribers.len(),
            delivered,
        }
    }

    async fn query(&self, product: &Product) -> std::result::Result<Observation, SourceError> {
        let Some(limit) = self.settings.check_timeout else {
            return self.source.query(&product.url).await;
        };
        match tokio::time::timeout(limit, self.source.query(&product.url)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                secs: limit.as_secs(),
            }),
        }
    }
}
