//! Recording [`Notifier`] for tests.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::UserId;
use crate::port::{DeliveryOutcome, Notifier, StatusChange};

/// One `notify` call as seen by the notifier.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub recipients: Vec<UserId>,
    pub change: StatusChange,
}

/// Keeps every change it is asked to deliver. Recipients marked with
/// [`RecordingNotifier::fail_for`] get a failed outcome.
#[derive(Default)]
pub struct RecordingNotifier {
    deliveries: Mutex<Vec<Delivery>>,
    failing: Mutex<HashSet<UserId>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail delivery to `user` from now on.
    pub fn fail_for(&self, user: UserId) {
        self.failing.lock().insert(user);
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.deliveries.lock().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, recipients: &[UserId], change: &StatusChange) -> Vec<DeliveryOutcome> {
        self.deliveries.lock().push(Delivery {
            recipients: recipients.to_vec(),
            change: change.clone(),
        });
        let failing = self.failing.lock();
        recipients
            .iter()
            .cloned()
            .map(|recipient| {
                if failing.contains(&recipient) {
                    DeliveryOutcome::failed(recipient, "scripted delivery failure")
                } else {
                    DeliveryOutcome::delivered(recipient)
                }
            })
            .collect()
    }
}
