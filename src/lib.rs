//! # Library Registry
//!
//! An in-memory catalog-and-lending registry that tells its subscribers
//! about every change.
//!
//! ## Core Concepts
//!
//! - **Items**: catalog entries with a unique identifier, title and author
//! - **Loans**: active borrowing relations between one item and one borrower
//! - **Subscribers**: shared handles that receive `(message, severity)`
//! - **Registry**: the facade that keeps the three consistent and publishes
//!   one notification per successful change
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use library_registry::{ItemRecord, LibraryRegistry, RegistryConfig, UserSink};
//!
//! let registry = LibraryRegistry::new(RegistryConfig::default());
//! let user = Arc::new(UserSink::new("user01"));
//! registry.add_subscriber(user.clone());
//!
//! registry.add_item(ItemRecord::new("1984", "George Orwell", "987654321")?)?;
//! registry.loan_item("987654321", "user01")?;
//! registry.return_item("987654321", "user01")?;
//!
//! assert_eq!(user.inbox().len(), 3);
//! # Ok::<(), library_registry::RegistryError>(())
//! ```

pub mod catalog;
pub mod error;
pub mod registry;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use catalog::{CatalogStore, LoanLedger, LoanPolicy};
pub use error::{RegistryError, Result};
pub use registry::{LibraryRegistry, RegistryConfig, RemovalPolicy};
pub use subscriptions::{
    CatalogEvent, ChannelSink, DeliveryError, DispatchReport, EmailSink, LogSink, Mailer,
    Notification, NotificationDispatcher, RecordingMailer, SentMail, Subscriber, SubscriberId,
    SubscriberRegistry, UserSink,
};
pub use types::*;
