mod common;

use budget_insights::{
    core::{
        services::{
            AnomalyService, ConfidenceService, HealthService, PredictionService, StatisticsService,
        },
        FixedClock,
    },
    domain::{HealthStatus, Model},
};
use common::{at, ledger_of};
use proptest::prelude::*;

static LABELS: [&str; 4] = ["food", "rent", "fuel", "fun"];
static OTHER_LABELS: [&str; 3] = ["rent", "fuel", "fun"];

fn arb_amount() -> impl Strategy<Value = f64> {
    (1u64..500_000).prop_map(|cents| cents as f64 / 100.0)
}

fn arb_entry(labels: &'static [&'static str]) -> impl Strategy<Value = (&'static str, f64)> {
    (prop::sample::select(labels), arb_amount())
}

fn arb_entries() -> impl Strategy<Value = Vec<(&'static str, f64)>> {
    prop::collection::vec(arb_entry(&LABELS), 0..25)
}

fn assert_bit_identical(left: &Model, right: &Model) {
    assert_eq!(left.record_count(), right.record_count());
    let pairs = left.categories().zip(right.categories());
    for ((label_a, a), (label_b, b)) in pairs {
        assert_eq!(label_a, label_b);
        assert_eq!(a.sample_count, b.sample_count);
        assert_eq!(a.average.to_bits(), b.average.to_bits());
        assert_eq!(a.dispersion.to_bits(), b.dispersion.to_bits());
        assert_eq!(
            a.effective_trend().magnitude_percent.to_bits(),
            b.effective_trend().magnitude_percent.to_bits()
        );
    }
    assert_eq!(left.category_count(), right.category_count());
}

#[test]
fn single_record_predicts_its_amount_at_twenty_percent() {
    for amount in [0.01, 37.25, 1200.0] {
        let ledger = ledger_of(&[("rent", 900.0), ("rent", 950.0), ("gift", amount)]);
        let model = StatisticsService::train(&ledger);
        let prediction = PredictionService::predict("gift", model.as_ref(), &ledger).unwrap();
        assert_eq!(prediction.expected_amount, amount);
        assert_eq!(prediction.confidence_percent, 20.0);
        assert_eq!(ConfidenceService::confidence("gift", &ledger), 20.0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn confidence_stays_within_bounds(entries in arb_entries()) {
        let ledger = ledger_of(&entries);
        for category in LABELS.iter().copied().chain(["missing"]) {
            let confidence = ConfidenceService::confidence(category, &ledger);
            prop_assert!(
                (0.0..=100.0).contains(&confidence),
                "confidence {} out of range for {}",
                confidence,
                category
            );
        }
    }

    #[test]
    fn categories_without_history_are_never_anomalous(
        entries in arb_entries(),
        amount in prop_oneof![Just(0.01), arb_amount(), Just(1e9)],
    ) {
        let ledger = ledger_of(&entries);
        let model = StatisticsService::train(&ledger);
        let verdict = AnomalyService::check(amount, "travel", &ledger, model.as_ref());
        prop_assert!(!verdict.is_anomalous);
        prop_assert!(verdict.typical_range.is_none());
    }

    #[test]
    fn training_is_idempotent(entries in arb_entries()) {
        let ledger = ledger_of(&entries);
        match (StatisticsService::train(&ledger), StatisticsService::train(&ledger)) {
            (Some(first), Some(second)) => assert_bit_identical(&first, &second),
            (None, None) => {
                prop_assert!(ledger.is_empty());
            }
            _ => {
                prop_assert!(false, "training disagreed with itself");
            }
        }
    }

    #[test]
    fn more_identical_records_never_lower_confidence(
        others in prop::collection::vec(arb_entry(&OTHER_LABELS), 0..6),
        amount in arb_amount(),
        repeats in 1usize..14,
    ) {
        let mut entries = others;
        let mut previous = ConfidenceService::confidence("food", &ledger_of(&entries));
        for _ in 0..repeats {
            entries.push(("food", amount));
            let current = ConfidenceService::confidence("food", &ledger_of(&entries));
            // identical amounts can leave float noise in the variation term
            prop_assert!(
                current + 1e-9 >= previous,
                "{} dropped below {}",
                current,
                previous
            );
            previous = current;
        }
        if repeats >= 7 {
            prop_assert!((previous - 100.0).abs() < 1e-9);
        }
    }
}

#[test]
fn scenario_single_prior_record_uses_half_band() {
    let ledger = ledger_of(&[("food", 100.0)]);

    let high = AnomalyService::check(160.0, "food", &ledger, None);
    assert!(high.is_anomalous);
    assert!(high.is_higher);

    let close = AnomalyService::check(140.0, "food", &ledger, None);
    assert!(!close.is_anomalous);
}

#[test]
fn scenario_seven_equal_records_are_fully_confident() {
    let ledger = ledger_of(&[("food", 50.0); 7]);
    assert_eq!(ConfidenceService::confidence("food", &ledger), 100.0);
}

#[test]
fn scenario_overspent_budget_is_critical() {
    let ledger = ledger_of(&[("rent", 800.0), ("food", 300.0)]);
    let clock = FixedClock(at(2024, 6, 3));
    let report = HealthService::evaluate(1000.0, &ledger, None, &clock);

    assert_eq!(report.status, HealthStatus::Critical);
    assert_eq!(report.utilization_percent, 110.0);
    assert_eq!(report.remaining_budget, -100.0);
    assert_eq!(report.headline, "CRITICAL: Budget exceeded by $100.00");
}

#[test]
fn scenario_spending_in_step_with_the_month_is_good() {
    // 3 days into June (30 days): 10% elapsed, 10% spent.
    let ledger = ledger_of(&[("food", 60.0), ("fuel", 40.0)]);
    let model = StatisticsService::train(&ledger);
    let clock = FixedClock(at(2024, 6, 3));
    let report = HealthService::evaluate(1000.0, &ledger, model.as_ref(), &clock);

    assert_eq!(report.status, HealthStatus::Good);
    assert_eq!(report.month_progress_percent, 10.0);
    assert_eq!(report.utilization_percent, 10.0);
    insta::assert_snapshot!(
        report.headline,
        @"GOOD: Spending on track (10.0% used vs 10.0% of time elapsed)"
    );
}
