//! Anomaly Detector: classifies a candidate amount against what a category's
//! history makes typical.

use crate::currency::round_amount;
use crate::domain::{AnomalyVerdict, Model, TypicalRange};
use crate::ledger::Ledger;

use super::prediction_service::{range_factor, PredictionService};

/// Relative deviation tolerated when only one prior record exists.
const SINGLE_RECORD_TOLERANCE: f64 = 0.5;

pub struct AnomalyService;

impl AnomalyService {
    /// Checks `amount` for `category`. Total for every input: categories without
    /// history are never anomalous.
    pub fn check(
        amount: f64,
        category: &str,
        ledger: &Ledger,
        model: Option<&Model>,
    ) -> AnomalyVerdict {
        let mut history = ledger.for_category(category);
        let first = match history.next() {
            Some(expense) => expense.amount,
            None => return AnomalyVerdict::unremarkable(),
        };
        if history.next().is_none() {
            return Self::against_single(amount, first);
        }

        let estimate = match PredictionService::estimate(category, model, ledger) {
            Some(estimate) => estimate,
            None => return AnomalyVerdict::unremarkable(),
        };

        // Noisy categories get a band wider than the prediction's own range.
        let factor = range_factor(estimate.confidence);
        let lower = estimate.suggested_min / factor;
        let upper = estimate.suggested_max * factor;

        AnomalyVerdict {
            is_anomalous: amount < lower || amount > upper,
            is_higher: amount > estimate.expected_amount,
            typical_range: Some(TypicalRange {
                min: round_amount(estimate.suggested_min),
                avg: round_amount(estimate.expected_amount),
                max: round_amount(estimate.suggested_max),
            }),
        }
    }

    fn against_single(amount: f64, prior: f64) -> AnomalyVerdict {
        if prior <= 0.0 {
            return AnomalyVerdict::unremarkable();
        }
        let relative = (amount - prior).abs() / prior;
        AnomalyVerdict {
            is_anomalous: relative > SINGLE_RECORD_TOLERANCE,
            is_higher: amount > prior,
            typical_range: Some(TypicalRange {
                min: round_amount((prior * 0.5).max(0.0)),
                avg: round_amount(prior),
                max: round_amount(prior * 1.5),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::StatisticsService;
    use crate::ledger::Expense;
    use chrono::{Duration, TimeZone, Utc};

    fn ledger_of(category: &str, oldest_first: &[f64]) -> Ledger {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 18, 30, 0).unwrap();
        oldest_first
            .iter()
            .enumerate()
            .map(|(day, amount)| {
                Expense::new(category, *amount, "entry", start + Duration::days(day as i64))
            })
            .collect()
    }

    #[test]
    fn no_history_is_never_anomalous() {
        let ledger = ledger_of("food", &[20.0, 22.0]);
        let verdict = AnomalyService::check(10_000.0, "travel", &ledger, None);
        assert!(!verdict.is_anomalous);
        assert!(verdict.typical_range.is_none());
    }

    #[test]
    fn single_record_uses_fifty_percent_band() {
        let ledger = ledger_of("food", &[100.0]);
        let high = AnomalyService::check(160.0, "food", &ledger, None);
        assert!(high.is_anomalous);
        assert!(high.is_higher);
        assert_eq!(
            high.typical_range,
            Some(TypicalRange {
                min: 50.0,
                avg: 100.0,
                max: 150.0
            })
        );

        let near = AnomalyService::check(140.0, "food", &ledger, None);
        assert!(!near.is_anomalous);

        let low = AnomalyService::check(40.0, "food", &ledger, None);
        assert!(low.is_anomalous);
        assert!(!low.is_higher);
    }

    #[test]
    fn consistent_history_flags_large_departures() {
        let ledger = ledger_of("coffee", &[4.0, 4.5, 4.0, 4.25, 4.5, 4.0, 4.25]);
        let model = StatisticsService::train(&ledger);

        let typical = AnomalyService::check(4.3, "coffee", &ledger, model.as_ref());
        assert!(!typical.is_anomalous);

        let spike = AnomalyService::check(40.0, "coffee", &ledger, model.as_ref());
        assert!(spike.is_anomalous);
        assert!(spike.is_higher);

        let dip = AnomalyService::check(0.5, "coffee", &ledger, model.as_ref());
        assert!(dip.is_anomalous);
        assert!(!dip.is_higher);
    }

    #[test]
    fn noisy_history_tolerates_amounts_past_the_suggested_max() {
        let ledger = ledger_of("gifts", &[20.0, 60.0]);
        let estimate = PredictionService::estimate("gifts", None, &ledger).unwrap();
        let factor = range_factor(estimate.confidence);
        assert!(factor > 1.0);

        let amount = (estimate.suggested_max + estimate.suggested_max * factor) / 2.0;
        assert!(amount > estimate.suggested_max);
        let verdict = AnomalyService::check(amount, "gifts", &ledger, None);
        assert!(!verdict.is_anomalous);
        assert!(verdict.is_higher);

        let beyond_band = estimate.suggested_max * factor + 1.0;
        let beyond = AnomalyService::check(beyond_band, "gifts", &ledger, None);
        assert!(beyond.is_anomalous);
    }

    #[test]
    fn model_from_same_sized_ledger_is_not_reused() {
        let stale = StatisticsService::train(&ledger_of("food", &[10.0, 10.0, 10.0]));
        let ledger = ledger_of("food", &[100.0, 100.0, 100.0]);

        let verdict = AnomalyService::check(100.0, "food", &ledger, stale.as_ref());
        assert!(!verdict.is_anomalous);
        assert_eq!(verdict.typical_range.map(|range| range.avg), Some(100.0));
    }

    #[test]
    fn typical_range_mirrors_prediction() {
        let ledger = ledger_of("fuel", &[50.0, 55.0, 60.0]);
        let model = StatisticsService::train(&ledger);
        let prediction = PredictionService::predict("fuel", model.as_ref(), &ledger).unwrap();
        let verdict = AnomalyService::check(55.0, "fuel", &ledger, model.as_ref());
        let range = verdict.typical_range.expect("range");
        assert_eq!(range.min, prediction.suggested_min);
        assert_eq!(range.avg, prediction.expected_amount);
        assert_eq!(range.max, prediction.suggested_max);
    }
}
