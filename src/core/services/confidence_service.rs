use crate::ledger::Ledger;

use super::statistics_service::{mean, population_std_dev};

/// Records at which sample size alone is treated as fully convincing.
const FULL_BLEND_RECORDS: f64 = 7.0;

/// Scores how far a category's history can be trusted, on a 0–100 scale.
pub struct ConfidenceService;

impl ConfidenceService {
    /// Confidence for `category`, computed from the raw ledger amounts.
    pub fn confidence(category: &str, ledger: &Ledger) -> f64 {
        let amounts: Vec<f64> = ledger
            .for_category(category)
            .map(|expense| expense.amount)
            .collect();
        Self::score(&amounts)
    }

    /// Blends a sample-count score with a consistency score. Few samples are
    /// judged on quantity; many samples are judged on their coefficient of
    /// variation.
    pub fn score(amounts: &[f64]) -> f64 {
        let count = amounts.len() as f64;
        if amounts.len() < 2 {
            return (count * 20.0).min(100.0);
        }

        let mean = mean(amounts);
        if mean == 0.0 {
            return 0.0;
        }
        let cv = population_std_dev(amounts, mean) / mean;
        let variance_confidence = (100.0 - cv * 200.0).max(0.0);
        let records_confidence = (count * 15.0).min(100.0);
        let blend = (count / FULL_BLEND_RECORDS).min(1.0);

        let blended = variance_confidence * blend + records_confidence * (1.0 - blend);
        if blended.is_finite() {
            blended.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}
