//! Item collection with identifier uniqueness.

use crate::error::{RegistryError, Result};
use crate::types::ItemRecord;
use parking_lot::RwLock;

/// Owns every [`ItemRecord`] in the catalog, in insertion order.
pub struct CatalogStore {
    /// Items in the order they were added.
    items: RwLock<Vec<ItemRecord>>,
}

impl CatalogStore {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Insert an item. Fails if another item already uses its identifier.
    pub fn add(&self, item: ItemRecord) -> Result<()> {
        let mut items = self.items.write();
        if items.iter().any(|existing| existing.id() == item.id()) {
            return Err(RegistryError::DuplicateIdentifier(item.id().to_string()));
        }
        items.push(item);
        Ok(())
    }

    /// Remove and return the item with this identifier.
    pub fn remove(&self, id: &str) -> Result<ItemRecord> {
        let mut items = self.items.write();
        match items.iter().position(|item| item.id() == id) {
            // `Vec::remove` keeps the remaining items in insertion order.
            Some(pos) => Ok(items.remove(pos)),
            None => Err(RegistryError::ItemNotFound(id.to_string())),
        }
    }

    /// Exact identifier lookup.
    pub fn find_by_id(&self, id: &str) -> Option<ItemRecord> {
        self.items.read().iter().find(|item| item.id() == id).cloned()
    }

    /// Check whether an identifier is in use.
    pub fn contains(&self, id: &str) -> bool {
        self.items.read().iter().any(|item| item.id() == id)
    }

    /// All items whose title contains `query` (case-sensitive).
    ///
    /// An empty query matches every item.
    pub fn find_by_title_substring(&self, query: &str) -> Vec<ItemRecord> {
        self.filter(|item| item.title().contains(query))
    }

    /// All items whose author contains `query` (case-sensitive).
    pub fn find_by_author_substring(&self, query: &str) -> Vec<ItemRecord> {
        self.filter(|item| item.author().contains(query))
    }

    /// Every item, in insertion order.
    pub fn all(&self) -> Vec<ItemRecord> {
        self.items.read().clone()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// True if the catalog holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    fn filter<F>(&self, predicate: F) -> Vec<ItemRecord>
    where
        F: Fn(&ItemRecord) -> bool,
    {
        self.items
            .read()
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
