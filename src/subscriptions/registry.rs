//! The ordered set of registered subscribers.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::types::{Subscriber, SubscriberId};

/// One registration. The same subscriber may appear in several.
struct Registration {
    id: SubscriberId,
    subscriber: Arc<dyn Subscriber>,
}

/// Holds subscribers by shared handle, in registration order.
///
/// The registry never owns a subscriber's lifetime: callers keep their own
/// `Arc` and use it (or the returned id) to unregister.
pub struct SubscriberRegistry {
    /// Registrations in the order they were added.
    registrations: RwLock<Vec<Registration>>,
    /// Counter for generating registration IDs.
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            registrations: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append a subscriber. Adding the same handle twice registers it twice.
    pub fn add(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.registrations
            .write()
            .push(Registration { id, subscriber });
        id
    }

    /// Remove the first registration of this exact handle.
    ///
    /// Matching is by allocation, not by value. Returns false if the handle
    /// was not registered.
    pub fn remove(&self, subscriber: &Arc<dyn Subscriber>) -> bool {
        let mut regs = self.registrations.write();
        match regs
            .iter()
            .position(|reg| same_subscriber(&reg.subscriber, subscriber))
        {
            Some(pos) => {
                regs.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Remove one registration by the id `add` returned.
    pub fn remove_by_id(&self, id: SubscriberId) -> bool {
        let mut regs = self.registrations.write();
        match regs.iter().position(|reg| reg.id == id) {
            Some(pos) => {
                regs.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Current subscribers in registration order.
    ///
    /// The returned handles are independent of the registry, so delivery can
    /// proceed without holding the lock.
    pub fn snapshot(&self) -> Vec<Arc<dyn Subscriber>> {
        self.registrations
            .read()
            .iter()
            .map(|reg| Arc::clone(&reg.subscriber))
            .collect()
    }

    /// Ids of current registrations, in order.
    pub fn ids(&self) -> Vec<SubscriberId> {
        self.registrations.read().iter().map(|reg| reg.id).collect()
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    /// True if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare data pointers only; vtable pointers for the same type can differ
/// between codegen units.
fn same_subscriber(a: &Arc<dyn Subscriber>, b: &Arc<dyn Subscriber>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
