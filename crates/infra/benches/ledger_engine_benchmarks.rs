use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::NaiveDate;
use stockledger_core::Entity;
use stockledger_infra::{InMemoryStore, LedgerConfig, StockLedger};
use stockledger_inventory::{
    Item, MutationPatch, MutationType, NewCategory, NewItem, NewLocation, NewMutation, NewUser,
};
use std::sync::{Arc, Barrier};
use std::thread;

type Store = Arc<InMemoryStore>;

struct Seeded {
    ledger: Arc<StockLedger<Store>>,
    item: Item,
    template: NewMutation,
}

fn setup() -> Seeded {
    let store: Store = Arc::new(InMemoryStore::new());
    let (ledger, catalog) = LedgerConfig::default().build(store);

    let category = catalog
        .create_category(NewCategory {
            name: "Bench".to_string(),
        })
        .unwrap();
    let location = catalog
        .create_location(NewLocation {
            name: "Bench shelf".to_string(),
            address: None,
        })
        .unwrap();
    let user = catalog
        .register_user(NewUser {
            name: "Bench".to_string(),
            email: "bench@example.com".to_string(),
        })
        .unwrap();
    let item = catalog
        .create_item(NewItem {
            name: "Bench item".to_string(),
            code: "BNCH".to_string(),
            category_id: category.id,
            location_id: location.id,
            description: "benchmark".to_string(),
        })
        .unwrap();

    let template = NewMutation {
        item_id: item.id(),
        user_id: user.id,
        kind: MutationType::Addition,
        amount: 1,
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        description: "bench".to_string(),
    };

    Seeded {
        ledger: Arc::new(ledger),
        item,
        template,
    }
}

fn bench_single_writer(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_writer");

    group.bench_function("create_mutation", |b| {
        let seeded = setup();
        b.iter(|| {
            seeded
                .ledger
                .create_mutation(black_box(seeded.template.clone()))
                .unwrap();
        });
    });

    group.bench_function("update_mutation_amount", |b| {
        let seeded = setup();
        let entry = seeded
            .ledger
            .create_mutation(seeded.template.clone())
            .unwrap();
        let mut amount = 1;
        b.iter(|| {
            amount = amount % 100 + 1;
            let patch = MutationPatch {
                amount: stockledger_inventory::AmountChange::Changed {
                    kind: MutationType::Addition,
                    amount: black_box(amount),
                },
                ..MutationPatch::default()
            };
            seeded
                .ledger
                .update_mutation(entry.mutation.id(), patch)
                .unwrap();
        });
    });

    group.finish();
}

fn bench_contended_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_item");
    group.sample_size(20);

    for writers in [1usize, 2, 4, 8].iter() {
        let per_writer = 50;
        group.throughput(Throughput::Elements((*writers * per_writer) as u64));
        group.bench_with_input(
            BenchmarkId::new("create_mutation", writers),
            writers,
            |b, &writers| {
                let seeded = setup();
                b.iter(|| {
                    let barrier = Arc::new(Barrier::new(writers));
                    let handles: Vec<_> = (0..writers)
                        .map(|_| {
                            let ledger = seeded.ledger.clone();
                            let barrier = barrier.clone();
                            let input = seeded.template.clone();
                            thread::spawn(move || {
                                barrier.wait();
                                for _ in 0..per_writer {
                                    ledger.create_mutation(input.clone()).unwrap();
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for ledger_len in [10usize, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("ledger_len", ledger_len),
            ledger_len,
            |b, &len| {
                let seeded = setup();
                for _ in 0..len {
                    seeded
                        .ledger
                        .create_mutation(seeded.template.clone())
                        .unwrap();
                }
                b.iter(|| black_box(seeded.ledger.reconcile(seeded.item.id()).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_writer, bench_contended_item, bench_reconcile);
criterion_main!(benches);
