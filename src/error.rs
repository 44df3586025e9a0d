//! Error types for the registry.

use thiserror::Error;

/// Main error type for registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate item identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("No active loan of item {item_id} to borrower {borrower_id}")]
    LoanNotFound {
        item_id: String,
        borrower_id: String,
    },

    #[error("Item {item_id} is already on loan (requested by {borrower_id})")]
    AlreadyLoaned {
        item_id: String,
        borrower_id: String,
    },

    #[error("Item {0} has an active loan and cannot be removed")]
    ItemOnLoan(String),

    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RegistryError {
    /// True for both flavours of "not found" (unknown item, unknown loan pair).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::ItemNotFound(_) | RegistryError::LoanNotFound { .. }
        )
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::Config(e.to_string())
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
