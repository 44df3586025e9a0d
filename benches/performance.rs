//! Performance benchmarks for the library registry.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use library_registry::{
    ItemRecord, LibraryRegistry, NotificationDispatcher, RegistryConfig, Severity, Subscriber,
    SubscriberRegistry,
};
use std::sync::Arc;

fn populated_registry(items: usize) -> LibraryRegistry {
    let registry = LibraryRegistry::new(RegistryConfig::default());
    for i in 0..items {
        let item = ItemRecord::new(format!("Title {}", i), format!("Author {}", i % 97), i.to_string())
            .unwrap();
        registry.add_item(item).unwrap();
    }
    registry
}

/// Benchmark substring search over catalogs of increasing size
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_by_author");

    for size in [100, 1_000, 10_000] {
        let registry = populated_registry(size);
        group.bench_with_input(BenchmarkId::new("items", size), &size, |b, _| {
            b.iter(|| black_box(registry.search_by_author("Author 42")));
        });
    }

    group.finish();
}

/// Benchmark a loan/return cycle against a populated catalog and ledger
fn bench_loan_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("loan_cycle");

    for active in [0, 100, 1_000] {
        group.bench_with_input(BenchmarkId::new("active_loans", active), &active, |b, &active| {
            let registry = populated_registry(active + 1);
            for i in 0..active {
                registry.loan_item(&i.to_string(), "holder").unwrap();
            }
            let target = active.to_string();

            b.iter(|| {
                registry.loan_item(&target, "bench").unwrap();
                registry.return_item(&target, "bench").unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark fan-out to many subscribers
fn bench_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish");

    for subscribers in [1, 10, 100] {
        let registry = Arc::new(SubscriberRegistry::new());
        for _ in 0..subscribers {
            let sub: Arc<dyn Subscriber> = Arc::new(|message: &str, _: Severity| {
                black_box(message.len());
            });
            registry.add(sub);
        }
        let dispatcher = NotificationDispatcher::new(Arc::clone(&registry));

        group.bench_with_input(
            BenchmarkId::new("subscribers", subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| black_box(dispatcher.publish("New item added: 1984", Severity::Generic)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_search, bench_loan_cycle, bench_publish);
criterion_main!(benches);
