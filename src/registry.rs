//! Main registry tying the catalog, the ledger and the subscribers together.

use crate::catalog::{CatalogStore, LoanLedger, LoanPolicy};
use crate::error::{RegistryError, Result};
use crate::subscriptions::{
    CatalogEvent, DispatchReport, NotificationDispatcher, Subscriber, SubscriberId,
    SubscriberRegistry,
};
use crate::types::{ItemRecord, LoanRecord, RegistryStats, Severity, Timestamp};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happens when an item with active loans is removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Refuse with [`RegistryError::ItemOnLoan`].
    #[default]
    RejectWhileLoaned,

    /// Close the item's loans, then remove it.
    CascadeLoans,
}

/// Registry configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Availability rule for new loans.
    pub loan_policy: LoanPolicy,

    /// Handling of loaned items on removal.
    pub removal_policy: RemovalPolicy,
}

impl RegistryConfig {
    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents).map_err(|e| match e {
            RegistryError::Config(msg) => {
                RegistryError::Config(format!("{}: {}", path.as_ref().display(), msg))
            }
            other => other,
        })
    }
}

/// The process-wide instance, see [`LibraryRegistry::shared`].
static SHARED: OnceCell<LibraryRegistry> = OnceCell::new();

/// The catalog-and-lending registry.
///
/// Provides a unified interface for:
/// - Adding, removing and searching items
/// - Opening and closing loans
/// - Managing subscribers and publishing notifications
///
/// Every successful mutation publishes exactly one notification. Failed
/// operations change nothing and publish nothing.
pub struct LibraryRegistry {
    /// Registry configuration.
    config: RegistryConfig,

    /// Item collection.
    catalog: CatalogStore,

    /// Active loans.
    ledger: LoanLedger,

    /// Subscriber set (shared with the dispatcher).
    subscribers: Arc<SubscriberRegistry>,

    /// Fan-out to subscribers.
    dispatcher: NotificationDispatcher,

    /// Serialises mutations that touch both the catalog and the ledger.
    write_lock: Mutex<()>,
}

impl LibraryRegistry {
    /// Create a registry with the given configuration.
    pub fn new(config: RegistryConfig) -> Self {
        let subscribers = Arc::new(SubscriberRegistry::new());
        let dispatcher = NotificationDispatcher::new(Arc::clone(&subscribers));

        info!(
            loan_policy = ?config.loan_policy,
            removal_policy = ?config.removal_policy,
            "library registry created"
        );

        Self {
            catalog: CatalogStore::new(),
            ledger: LoanLedger::with_policy(config.loan_policy),
            subscribers,
            dispatcher,
            write_lock: Mutex::new(()),
            config,
        }
    }

    /// The process-wide registry, built with the default configuration on
    /// first access.
    pub fn shared() -> &'static LibraryRegistry {
        Self::shared_with(RegistryConfig::default())
    }

    /// The process-wide registry. `config` is used only if this call is the
    /// one that constructs it; concurrent first callers still get a single
    /// instance.
    pub fn shared_with(config: RegistryConfig) -> &'static LibraryRegistry {
        SHARED.get_or_init(|| LibraryRegistry::new(config))
    }

    /// Configuration in force.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // --- Item Operations ---

    /// Add an item to the catalog.
    pub fn add_item(&self, item: ItemRecord) -> Result<()> {
        let lock = self.write_lock.lock();

        if let Err(e) = self.catalog.add(item.clone()) {
            warn!(item_id = item.id(), "add rejected: {}", e);
            return Err(e);
        }
        debug!(item_id = item.id(), title = item.title(), "item added");

        drop(lock);
        self.publish_event(CatalogEvent::ItemAdded { item });
        Ok(())
    }

    /// Remove an item from the catalog and return it.
    ///
    /// An item with active loans is refused or has its loans closed,
    /// depending on [`RemovalPolicy`].
    pub fn remove_item(&self, id: &str) -> Result<ItemRecord> {
        let lock = self.write_lock.lock();

        if !self.catalog.contains(id) {
            warn!(item_id = id, "remove rejected: unknown item");
            return Err(RegistryError::ItemNotFound(id.to_string()));
        }

        let closed_loans = if self.ledger.is_loaned(id) {
            match self.config.removal_policy {
                RemovalPolicy::RejectWhileLoaned => {
                    warn!(item_id = id, "remove rejected: item is on loan");
                    return Err(RegistryError::ItemOnLoan(id.to_string()));
                }
                RemovalPolicy::CascadeLoans => self.ledger.close_all_for_item(id),
            }
        } else {
            Vec::new()
        };

        // Presence was checked under the write lock, so this cannot miss.
        let item = self.catalog.remove(id)?;
        debug!(item_id = id, closed = closed_loans.len(), "item removed");

        drop(lock);
        self.publish_event(CatalogEvent::ItemRemoved { item: item.clone(), closed_loans });
        Ok(item)
    }

    /// Exact identifier lookup.
    pub fn find_by_id(&self, id: &str) -> Option<ItemRecord> {
        self.catalog.find_by_id(id)
    }

    /// Items whose title contains `query`, in insertion order.
    pub fn search_by_title(&self, query: &str) -> Vec<ItemRecord> {
        self.catalog.find_by_title_substring(query)
    }

    /// Items whose author contains `query`, in insertion order.
    pub fn search_by_author(&self, query: &str) -> Vec<ItemRecord> {
        self.catalog.find_by_author_substring(query)
    }

    /// Every item, in insertion order.
    pub fn items(&self) -> Vec<ItemRecord> {
        self.catalog.all()
    }

    // --- Loan Operations ---

    /// Lend an item to a borrower, stamped with the current time.
    pub fn loan_item(&self, item_id: &str, borrower_id: &str) -> Result<LoanRecord> {
        self.loan_item_at(item_id, borrower_id, Timestamp::now())
    }

    /// Lend an item to a borrower with an explicit loan time.
    pub fn loan_item_at(
        &self,
        item_id: &str,
        borrower_id: &str,
        at: Timestamp,
    ) -> Result<LoanRecord> {
        let lock = self.write_lock.lock();

        let loan = match self.ledger.open(&self.catalog, item_id, borrower_id, at) {
            Ok(loan) => loan,
            Err(e) => {
                warn!(item_id, borrower_id, "loan rejected: {}", e);
                return Err(e);
            }
        };
        let title = self.title_of(item_id);
        debug!(item_id, borrower_id, "loan opened");

        drop(lock);
        self.publish_event(CatalogEvent::LoanOpened { loan: loan.clone(), title });
        Ok(loan)
    }

    /// Close the loan of `item_id` to `borrower_id`.
    pub fn return_item(&self, item_id: &str, borrower_id: &str) -> Result<LoanRecord> {
        let lock = self.write_lock.lock();

        let loan = match self.ledger.close(item_id, borrower_id) {
            Ok(loan) => loan,
            Err(e) => {
                warn!(item_id, borrower_id, "return rejected: {}", e);
                return Err(e);
            }
        };
        let title = self.title_of(item_id);
        debug!(item_id, borrower_id, "loan closed");

        drop(lock);
        self.publish_event(CatalogEvent::LoanClosed { loan: loan.clone(), title });
        Ok(loan)
    }

    /// Every active loan.
    pub fn active_loans(&self) -> Vec<LoanRecord> {
        self.ledger.all()
    }

    /// Active loans held by a borrower.
    pub fn loans_for_borrower(&self, borrower_id: &str) -> Vec<LoanRecord> {
        self.ledger.loans_for_borrower(borrower_id)
    }

    /// Active loans of one item.
    pub fn loans_for_item(&self, item_id: &str) -> Vec<LoanRecord> {
        self.ledger.loans_for_item(item_id)
    }

    /// The loan for an exact pair, if active.
    pub fn find_loan(&self, item_id: &str, borrower_id: &str) -> Option<LoanRecord> {
        self.ledger.find(item_id, borrower_id)
    }

    /// True if anyone holds the item.
    pub fn is_loaned(&self, item_id: &str) -> bool {
        self.ledger.is_loaned(item_id)
    }

    // --- Subscriber Operations ---

    /// Register a subscriber.
    pub fn add_subscriber(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        let id = self.subscribers.add(subscriber);
        debug!(subscriber = id.0, "subscriber added");
        id
    }

    /// Unregister the first registration of this handle.
    pub fn remove_subscriber(&self, subscriber: &Arc<dyn Subscriber>) -> bool {
        self.subscribers.remove(subscriber)
    }

    /// Unregister by id.
    pub fn remove_subscriber_by_id(&self, id: SubscriberId) -> bool {
        self.subscribers.remove_by_id(id)
    }

    /// Number of registrations.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Publish a free-form message to every subscriber.
    pub fn notify(&self, message: &str, severity: Severity) -> DispatchReport {
        self.dispatcher.publish(message, severity)
    }

    /// Current sizes of the catalog, the ledger and the subscriber set.
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            items: self.catalog.len(),
            active_loans: self.ledger.len(),
            subscribers: self.subscribers.len(),
        }
    }

    // --- Internal ---

    /// Title for notifications; falls back to the id for unknown items.
    fn title_of(&self, item_id: &str) -> String {
        self.catalog
            .find_by_id(item_id)
            .map(|item| item.title().to_string())
            .unwrap_or_else(|| item_id.to_string())
    }

    /// Must be called without holding `write_lock`.
    fn publish_event(&self, event: CatalogEvent) {
        let report = self.dispatcher.publish(&event.message(), event.severity());
        if report.failed > 0 {
            warn!(
                failed = report.failed,
                delivered = report.delivered,
                "some subscribers did not receive the notification"
            );
        }
    }
}

impl Default for LibraryRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
