//! Active loans and the borrowing invariants.

use crate::catalog::CatalogStore;
use crate::error::{RegistryError, Result};
use crate::types::{LoanRecord, Timestamp};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// How many borrowers one item may have at the same time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanPolicy {
    /// At most one active loan per item.
    #[default]
    SingleActive,

    /// Any number of borrowers per item. A borrower still cannot hold two
    /// loans of the same item.
    Permissive,
}

/// Owns every active [`LoanRecord`].
///
/// Lookups are linear scans; a loan is identified by its exact
/// `(item_id, borrower_id)` pair.
pub struct LoanLedger {
    /// Active loans in the order they were opened.
    loans: RwLock<Vec<LoanRecord>>,

    /// Availability rule applied by `open`.
    policy: LoanPolicy,
}

impl LoanLedger {
    /// Create an empty ledger enforcing a single active loan per item.
    pub fn new() -> Self {
        Self::with_policy(LoanPolicy::default())
    }

    /// Create an empty ledger with an explicit policy.
    pub fn with_policy(policy: LoanPolicy) -> Self {
        Self {
            loans: RwLock::new(Vec::new()),
            policy,
        }
    }

    /// The availability rule in force.
    pub fn policy(&self) -> LoanPolicy {
        self.policy
    }

    /// Open a loan of `item_id` to `borrower_id`.
    ///
    /// The item must exist in `catalog`. Under [`LoanPolicy::SingleActive`]
    /// it must also not be on loan to anyone.
    pub fn open(
        &self,
        catalog: &CatalogStore,
        item_id: &str,
        borrower_id: &str,
        at: Timestamp,
    ) -> Result<LoanRecord> {
        let mut loans = self.loans.write();

        if !catalog.contains(item_id) {
            return Err(RegistryError::ItemNotFound(item_id.to_string()));
        }

        let conflict = match self.policy {
            LoanPolicy::SingleActive => loans.iter().any(|loan| loan.item_id == item_id),
            LoanPolicy::Permissive => loans.iter().any(|loan| loan.matches(item_id, borrower_id)),
        };
        if conflict {
            return Err(RegistryError::AlreadyLoaned {
                item_id: item_id.to_string(),
                borrower_id: borrower_id.to_string(),
            });
        }

        let loan = LoanRecord {
            item_id: item_id.to_string(),
            borrower_id: borrower_id.to_string(),
            borrowed_at: at,
        };
        loans.push(loan.clone());
        Ok(loan)
    }

    /// Close the loan for this exact pair and return it.
    pub fn close(&self, item_id: &str, borrower_id: &str) -> Result<LoanRecord> {
        let mut loans = self.loans.write();
        match loans.iter().position(|loan| loan.matches(item_id, borrower_id)) {
            Some(pos) => Ok(loans.remove(pos)),
            None => Err(RegistryError::LoanNotFound {
                item_id: item_id.to_string(),
                borrower_id: borrower_id.to_string(),
            }),
        }
    }

    /// Close every loan of an item, returning what was closed.
    pub fn close_all_for_item(&self, item_id: &str) -> Vec<LoanRecord> {
        let mut loans = self.loans.write();
        let mut closed = Vec::new();
        loans.retain(|loan| {
            if loan.item_id == item_id {
                closed.push(loan.clone());
                false
            } else {
                true
            }
        });
        closed
    }

    /// Look up the loan for an exact pair.
    pub fn find(&self, item_id: &str, borrower_id: &str) -> Option<LoanRecord> {
        self.loans
            .read()
            .iter()
            .find(|loan| loan.matches(item_id, borrower_id))
            .cloned()
    }

    /// True if anyone currently holds the item.
    pub fn is_loaned(&self, item_id: &str) -> bool {
        self.loans.read().iter().any(|loan| loan.item_id == item_id)
    }

    /// Active loans of an item.
    pub fn loans_for_item(&self, item_id: &str) -> Vec<LoanRecord> {
        self.loans
            .read()
            .iter()
            .filter(|loan| loan.item_id == item_id)
            .cloned()
            .collect()
    }

    /// Active loans held by a borrower.
    pub fn loans_for_borrower(&self, borrower_id: &str) -> Vec<LoanRecord> {
        self.loans
            .read()
            .iter()
            .filter(|loan| loan.borrower_id == borrower_id)
            .cloned()
            .collect()
    }

    /// Every active loan.
    pub fn all(&self) -> Vec<LoanRecord> {
        self.loans.read().clone()
    }

    /// Number of active loans.
    pub fn len(&self) -> usize {
        self.loans.read().len()
    }

    /// True if nothing is on loan.
    pub fn is_empty(&self) -> bool {
        self.loans.read().is_empty()
    }
}

impl Default for LoanLedger {
    fn default() -> Self {
        Self::new()
    }
}
