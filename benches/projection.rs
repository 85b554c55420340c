//! Criterion benchmarks for budget and goal projection over a large record set.

use balance_core::domain::{Budget, Generator, Goal, Periodicity, Transaction, Window};
use balance_core::{BudgetService, GoalService, MemoryStore};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use uuid::Uuid;

fn build_sample_store(txn_count: usize) -> (MemoryStore, Uuid, Uuid, Uuid) {
    let owner = Uuid::new_v4();
    let mut store = MemoryStore::new();
    let goal = store.add_goal(Goal::new(owner, "Benchmark goal", Decimal::new(1_000_000, 0)));
    let checking = store.add_budget(Budget::new(owner, "Checking").with_goal(goal));
    let savings = store.add_budget(Budget::new(owner, "Savings").with_goal(goal));

    let start_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    for idx in 0..txn_count {
        let date = start_date + Duration::days((idx % 1_825) as i64);
        let amount = Decimal::new(5_000 + (idx % 100) as i64, 2);
        let txn = Transaction::new(owner, "Sample", date, amount);
        let txn = if idx % 2 == 0 {
            txn.with_budget_from(checking).with_budget_to(savings)
        } else {
            txn.with_budget_to(checking)
        };
        store.add_transaction(txn);
    }
    store.add_generator(
        Generator::new(
            owner,
            "Daily coffee",
            Decimal::new(350, 2),
            Periodicity::daily(1).unwrap(),
            start_date,
        )
        .with_budget_from(checking),
    );
    store.add_generator(
        Generator::new(
            owner,
            "Salary",
            Decimal::new(3_000, 0),
            Periodicity::monthly(1).unwrap(),
            start_date,
        )
        .with_budget_to(checking),
    );

    (store, owner, checking, goal)
}

fn bench_projection(c: &mut Criterion) {
    let (store, owner, checking, goal) = build_sample_store(black_box(10_000));
    let window = Window::bounded(
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    )
    .expect("valid window");

    c.bench_function("budget_series_10k_two_years", |b| {
        let service = BudgetService::new(&store);
        b.iter(|| {
            let summary = service
                .series(owner, checking, black_box(&window))
                .expect("project budget");
            black_box(summary);
        })
    });

    c.bench_function("goal_series_10k_two_years", |b| {
        let service = GoalService::new(&store);
        b.iter(|| {
            let summary = service
                .series(owner, goal, black_box(&window))
                .expect("project goal");
            black_box(summary);
        })
    });
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);
