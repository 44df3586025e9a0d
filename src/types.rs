//! Core types for the registry.

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Microseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time. A clock set before the epoch reads as zero.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_micros() as i64)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// A catalog item (a book).
///
/// Identity fields are fixed at construction; the only way to "change" an
/// item is to remove it and add a new one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawItemRecord")]
pub struct ItemRecord {
    title: String,
    author: String,
    id: String,
}

impl ItemRecord {
    /// Build a validated item. The identifier must contain something other
    /// than whitespace.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        id: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RegistryError::InvalidItem(
                "item identifier must not be empty".to_string(),
            ));
        }

        Ok(Self {
            title: title.into(),
            author: author.into(),
            id,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Catalog identifier (ISBN or similar).
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Unvalidated wire form of [`ItemRecord`].
#[derive(Deserialize)]
struct RawItemRecord {
    title: String,
    author: String,
    id: String,
}

impl TryFrom<RawItemRecord> for ItemRecord {
    type Error = RegistryError;

    fn try_from(raw: RawItemRecord) -> Result<Self> {
        ItemRecord::new(raw.title, raw.author, raw.id)
    }
}

impl fmt::Display for ItemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" by {} [{}]", self.title, self.author, self.id)
    }
}

/// An active borrowing relation between one item and one borrower.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    /// Identifier of the borrowed item. Not an owning reference.
    pub item_id: String,

    /// Who borrowed it.
    pub borrower_id: String,

    /// When the loan was opened.
    pub borrowed_at: Timestamp,
}

impl LoanRecord {
    /// Check whether this loan is for the given pair.
    pub fn matches(&self, item_id: &str, borrower_id: &str) -> bool {
        self.item_id == item_id && self.borrower_id == borrower_id
    }
}

/// Coarse classification of a notification.
///
/// Severity never changes who receives a message; sinks may use it for
/// formatting or routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Generic,
}

impl Severity {
    /// Lowercase name, as used in configuration and structured logs.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Generic => "generic",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self {
            Severity::Info => "[INFO]",
            Severity::Warning => "[WARNING]",
            Severity::Generic => "[MESSAGE]",
        };
        f.write_str(prefix)
    }
}

/// Registry statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub items: usize,
    pub active_loans: usize,
    pub subscribers: usize,
}
