//! Subscription types for catalog notifications.

use crate::types::{ItemRecord, LoanRecord, Severity, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Anything that wants to hear about catalog changes.
///
/// A sink reports trouble by returning an error; the dispatcher logs it and
/// moves on to the next subscriber.
pub trait Subscriber: Send + Sync {
    /// Handle one notification.
    fn receive(&self, message: &str, severity: Severity) -> Result<(), DeliveryError>;
}

impl<F> Subscriber for F
where
    F: Fn(&str, Severity) + Send + Sync,
{
    fn receive(&self, message: &str, severity: Severity) -> Result<(), DeliveryError> {
        self(message, severity);
        Ok(())
    }
}

/// Why a single delivery failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Subscriber buffer is full")]
    BufferFull,

    #[error("Subscriber disconnected")]
    Disconnected,

    #[error("Subscriber panicked: {0}")]
    Panicked(String),

    #[error("Delivery failed: {0}")]
    Failed(String),
}

/// Unique identifier for one registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

/// Outcome of one publish.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Subscribers that accepted the message.
    pub delivered: usize,
    /// Subscribers that returned an error or panicked.
    pub failed: usize,
}

impl DispatchReport {
    /// Number of subscribers that were attempted.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

/// A message as kept by sinks that store or forward what they receive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub received_at: Timestamp,
}

impl Notification {
    pub fn new(message: &str, severity: Severity) -> Self {
        Self {
            message: message.to_string(),
            severity,
            received_at: Timestamp::now(),
        }
    }
}

/// Catalog changes that produce a notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    /// A new item was added to the catalog.
    ItemAdded { item: ItemRecord },

    /// An item was removed. `closed_loans` is non-empty only for a
    /// cascading removal.
    ItemRemoved {
        item: ItemRecord,
        closed_loans: Vec<LoanRecord>,
    },

    /// An item was lent out.
    LoanOpened { loan: LoanRecord, title: String },

    /// A loan was returned.
    LoanClosed { loan: LoanRecord, title: String },
}

impl CatalogEvent {
    /// Severity attached to the published message.
    pub fn severity(&self) -> Severity {
        match self {
            CatalogEvent::ItemAdded { .. } => Severity::Generic,
            CatalogEvent::ItemRemoved { .. }
            | CatalogEvent::LoanOpened { .. }
            | CatalogEvent::LoanClosed { .. } => Severity::Info,
        }
    }

    /// Text delivered to every subscriber.
    pub fn message(&self) -> String {
        match self {
            CatalogEvent::ItemAdded { item } => format!("New item added: {}", item.title()),
            CatalogEvent::ItemRemoved { item, closed_loans } if closed_loans.is_empty() => {
                format!("Item removed: {}", item.title())
            }
            CatalogEvent::ItemRemoved { item, closed_loans } => format!(
                "Item removed: {} ({} active loans closed)",
                item.title(),
                closed_loans.len()
            ),
            CatalogEvent::LoanOpened { loan, title } => {
                format!("User {} borrowed item: {}", loan.borrower_id, title)
            }
            CatalogEvent::LoanClosed { loan, title } => {
                format!("User {} returned item: {}", loan.borrower_id, title)
            }
        }
    }
}
