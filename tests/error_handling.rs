//! Error handling and edge case tests.

use library_registry::{
    DeliveryError, ItemRecord, LibraryRegistry, LoanPolicy, RegistryConfig, RegistryError,
    RemovalPolicy, Severity, Subscriber, UserSink,
};
use std::sync::Arc;
use tempfile::TempDir;

fn test_registry() -> LibraryRegistry {
    LibraryRegistry::new(RegistryConfig::default())
}

fn book(title: &str, id: &str) -> ItemRecord {
    ItemRecord::new(title, "anon", id).unwrap()
}

// --- Item Errors ---

#[test]
fn test_duplicate_identifier_leaves_catalog_unchanged() {
    let registry = test_registry();
    registry.add_item(book("Original", "1")).unwrap();

    let result = registry.add_item(book("Impostor", "1"));
    assert!(matches!(result, Err(RegistryError::DuplicateIdentifier(ref id)) if id == "1"));

    let items = registry.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(), "Original");
}

#[test]
fn test_remove_then_find_reports_not_found() {
    let registry = test_registry();
    registry.add_item(book("Gone", "1")).unwrap();

    registry.remove_item("1").unwrap();
    assert!(registry.find_by_id("1").is_none());

    let result = registry.remove_item("1");
    assert!(matches!(result, Err(RegistryError::ItemNotFound(_))));
}

#[test]
fn test_empty_identifier_rejected_by_constructor() {
    let result = ItemRecord::new("No id", "anon", "");
    assert!(matches!(result, Err(RegistryError::InvalidItem(_))));
}

#[test]
fn test_removed_id_can_be_reused() {
    let registry = test_registry();
    registry.add_item(book("First edition", "1")).unwrap();
    registry.remove_item("1").unwrap();
    registry.add_item(book("Second edition", "1")).unwrap();

    assert_eq!(registry.find_by_id("1").unwrap().title(), "Second edition");
}

// --- Loan Errors ---

#[test]
fn test_loan_unknown_item() {
    let registry = test_registry();
    let result = registry.loan_item("missing", "u1");
    assert!(matches!(result, Err(RegistryError::ItemNotFound(_))));
    assert!(registry.active_loans().is_empty());
}

#[test]
fn test_already_loaned_under_default_policy() {
    let registry = test_registry();
    registry.add_item(book("Popular", "1")).unwrap();
    registry.loan_item("1", "u1").unwrap();

    let other = registry.loan_item("1", "u2");
    assert!(matches!(other, Err(RegistryError::AlreadyLoaned { .. })));

    let same = registry.loan_item("1", "u1");
    assert!(matches!(same, Err(RegistryError::AlreadyLoaned { .. })));

    assert_eq!(registry.active_loans().len(), 1);
}

#[test]
fn test_permissive_policy_still_rejects_same_pair() {
    let registry = LibraryRegistry::new(RegistryConfig {
        loan_policy: LoanPolicy::Permissive,
        ..Default::default()
    });
    registry.add_item(book("Popular", "1")).unwrap();

    registry.loan_item("1", "u1").unwrap();
    registry.loan_item("1", "u2").unwrap();
    let result = registry.loan_item("1", "u1");

    assert!(matches!(result, Err(RegistryError::AlreadyLoaned { .. })));
    assert_eq!(registry.loans_for_item("1").len(), 2);
}

#[test]
fn test_return_requires_exact_pair() {
    let registry = test_registry();
    registry.add_item(book("Borrowed", "1")).unwrap();
    registry.loan_item("1", "u1").unwrap();

    let wrong_user = registry.return_item("1", "u2");
    assert!(matches!(wrong_user, Err(RegistryError::LoanNotFound { .. })));

    registry.return_item("1", "u1").unwrap();
    let twice = registry.return_item("1", "u1");
    assert!(twice.unwrap_err().is_not_found());
}

#[test]
fn test_item_on_loan_cannot_be_removed() {
    let registry = test_registry();
    registry.add_item(book("Borrowed", "1")).unwrap();
    registry.loan_item("1", "u1").unwrap();

    let result = registry.remove_item("1");
    assert!(matches!(result, Err(RegistryError::ItemOnLoan(_))));

    registry.return_item("1", "u1").unwrap();
    registry.remove_item("1").unwrap();
}

#[test]
fn test_cascade_removal_closes_loans() {
    let registry = LibraryRegistry::new(RegistryConfig {
        removal_policy: RemovalPolicy::CascadeLoans,
        ..Default::default()
    });
    registry.add_item(book("Borrowed", "1")).unwrap();
    registry.loan_item("1", "u1").unwrap();

    registry.remove_item("1").unwrap();

    assert!(registry.find_loan("1", "u1").is_none());
    let result = registry.return_item("1", "u1");
    assert!(matches!(result, Err(RegistryError::LoanNotFound { .. })));
}

// --- Subscriber Failures ---

struct Broken;

impl Subscriber for Broken {
    fn receive(&self, _message: &str, _severity: Severity) -> Result<(), DeliveryError> {
        Err(DeliveryError::Failed("mail server unreachable".to_string()))
    }
}

struct Exploding;

impl Subscriber for Exploding {
    fn receive(&self, _message: &str, _severity: Severity) -> Result<(), DeliveryError> {
        panic!("subscriber bug");
    }
}

#[test]
fn test_failing_subscribers_do_not_fail_the_operation() {
    let registry = test_registry();
    let inbox = Arc::new(UserSink::new("u"));

    registry.add_subscriber(Arc::new(Broken));
    registry.add_subscriber(Arc::new(Exploding));
    registry.add_subscriber(inbox.clone());

    registry.add_item(book("Resilient", "1")).unwrap();
    registry.loan_item("1", "u").unwrap();

    assert_eq!(inbox.inbox().len(), 2);
    assert!(registry.is_loaned("1"));

    let report = registry.notify("ping", Severity::Info);
    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed, 2);
}

#[test]
fn test_removing_unknown_subscriber_is_noop() {
    let registry = test_registry();
    let known: Arc<dyn Subscriber> = Arc::new(UserSink::new("known"));
    let stranger: Arc<dyn Subscriber> = Arc::new(UserSink::new("known"));

    registry.add_subscriber(Arc::clone(&known));

    // Equal contents, different identity.
    assert!(!registry.remove_subscriber(&stranger));
    assert_eq!(registry.subscriber_count(), 1);
}

// --- Configuration Errors ---

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let result = RegistryConfig::from_json_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(RegistryError::Io(_))));
}

#[test]
fn test_malformed_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = RegistryConfig::from_json_file(&path);
    match result {
        Err(RegistryError::Config(msg)) => assert!(msg.contains("broken.json")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = RegistryConfig::from_json_str("{}").unwrap();
    assert_eq!(config, RegistryConfig::default());
    assert_eq!(config.loan_policy, LoanPolicy::SingleActive);
    assert_eq!(config.removal_policy, RemovalPolicy::RejectWhileLoaned);
}
