//! Subscription system for catalog notifications.
//!
//! This module provides in-process fan-out of catalog events:
//! - Item additions and removals
//! - Loans opened and closed
//! - Free-form messages from the embedding program
//!
//! Subscribers are shared handles (`Arc<dyn Subscriber>`). Each publish
//! snapshots the current list and delivers outside any lock, so a
//! subscriber may unregister itself or others while being notified.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use library_registry::{NotificationDispatcher, Severity, Subscriber, SubscriberRegistry};
//!
//! let registry = Arc::new(SubscriberRegistry::new());
//! let printer: Arc<dyn Subscriber> = Arc::new(|msg: &str, severity: Severity| {
//!     println!("{} {}", severity, msg);
//! });
//! registry.add(Arc::clone(&printer));
//!
//! let dispatcher = NotificationDispatcher::new(Arc::clone(&registry));
//! let report = dispatcher.publish("New item added: 1984", Severity::Generic);
//! assert_eq!(report.delivered, 1);
//! ```

mod dispatcher;
mod registry;
pub mod sinks;
mod types;

pub use dispatcher::NotificationDispatcher;
pub use registry::SubscriberRegistry;
pub use sinks::{ChannelSink, EmailSink, LogSink, Mailer, RecordingMailer, SentMail, UserSink};
pub use types::{
    CatalogEvent, DeliveryError, DispatchReport, Notification, Subscriber, SubscriberId,
};
