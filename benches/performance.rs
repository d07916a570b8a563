use budget_insights::core::services::{HealthService, PredictionService, StatisticsService};
use budget_insights::core::FixedClock;
use budget_insights::ledger::{Expense, Ledger};
use budget_insights::utils::persistence::{
    load_snapshot_from_file, save_snapshot_to_file, Snapshot, CURRENT_SCHEMA_VERSION,
};
use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

const CATEGORIES: [&str; 8] = [
    "rent", "food", "fuel", "utilities", "health", "fun", "travel", "gifts",
];

fn build_sample_ledger(record_count: usize) -> Ledger {
    let start = Utc
        .with_ymd_and_hms(2025, 1, 1, 8, 0, 0)
        .single()
        .expect("valid start");
    (0..record_count)
        .map(|idx| {
            let category = CATEGORIES[idx % CATEGORIES.len()];
            let amount = 5.0 + ((idx * 37) % 400) as f64 + (idx % 7) as f64 * 0.25;
            Expense::new(
                category,
                amount,
                "bench",
                start + Duration::hours(idx as i64 * 5),
            )
        })
        .collect()
}

fn bench_training(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(2_000));

    c.bench_function("train_2k", |b| {
        b.iter(|| black_box(StatisticsService::train(&ledger)))
    });

    let model = StatisticsService::train(&ledger);
    c.bench_function("predict_all_categories_2k", |b| {
        b.iter(|| {
            for category in CATEGORIES {
                black_box(PredictionService::predict(category, model.as_ref(), &ledger));
            }
        })
    });

    let clock = FixedClock(
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
            .single()
            .expect("valid now"),
    );
    c.bench_function("evaluate_health_2k", |b| {
        b.iter(|| black_box(HealthService::evaluate(250_000.0, &ledger, model.as_ref(), &clock)))
    });
}

fn bench_snapshot_io(c: &mut Criterion) {
    let snapshot = Snapshot {
        total_budget: 250_000.0,
        expenses: build_sample_ledger(2_000),
        categories: CATEGORIES.into_iter().collect(),
        export_date: Utc::now(),
        schema_version: CURRENT_SCHEMA_VERSION,
    };
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");

    c.bench_function("snapshot_save_2k", |b| {
        b.iter(|| save_snapshot_to_file(&snapshot, &path).expect("save snapshot"))
    });

    save_snapshot_to_file(&snapshot, &path).expect("seed");
    c.bench_function("snapshot_load_2k", |b| {
        b.iter(|| black_box(load_snapshot_from_file(&path).expect("load snapshot")))
    });
}

criterion_group!(benches, bench_training, bench_snapshot_io);
criterion_main!(benches);
