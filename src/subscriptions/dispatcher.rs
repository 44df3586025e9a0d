//! Fan-out of one message to every current subscriber.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, trace, warn};

use super::registry::SubscriberRegistry;
use super::types::{DeliveryError, DispatchReport, Subscriber};
use crate::types::Severity;

/// Delivers messages to the subscribers of a [`SubscriberRegistry`].
pub struct NotificationDispatcher {
    subscribers: Arc<SubscriberRegistry>,
}

impl NotificationDispatcher {
    /// Create a dispatcher over a shared registry.
    pub fn new(subscribers: Arc<SubscriberRegistry>) -> Self {
        Self { subscribers }
    }

    /// The registry this dispatcher reads from.
    pub fn subscribers(&self) -> &Arc<SubscriberRegistry> {
        &self.subscribers
    }

    /// Deliver `message` to every subscriber, in registration order.
    ///
    /// The subscriber list is snapshotted first and no lock is held while
    /// delivering. Severity is passed through untouched. A subscriber that
    /// errors or panics is logged and counted; the rest still receive the
    /// message.
    pub fn publish(&self, message: &str, severity: Severity) -> DispatchReport {
        let snapshot = self.subscribers.snapshot();
        let mut report = DispatchReport::default();

        for (position, subscriber) in snapshot.iter().enumerate() {
            match deliver(subscriber.as_ref(), message, severity) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    match e {
                        DeliveryError::Panicked(_) => {
                            error!(position, severity = severity.label(), "subscriber panicked: {}", e)
                        }
                        _ => warn!(position, severity = severity.label(), "delivery failed: {}", e),
                    }
                }
            }
        }

        trace!(
            delivered = report.delivered,
            failed = report.failed,
            "published notification"
        );
        report
    }
}

/// Invoke one subscriber, turning a panic into a delivery error.
fn deliver(subscriber: &dyn Subscriber, message: &str, severity: Severity) -> Result<(), DeliveryError> {
    match panic::catch_unwind(AssertUnwindSafe(|| subscriber.receive(message, severity))) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "(non-string panic)".to_string());
            Err(DeliveryError::Panicked(reason))
        }
    }
}
