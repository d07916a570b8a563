//! Category Statistics Engine: rebuilds the per-category [`Model`] from the
//! full ledger on every call.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{CategoryStats, Model, Trend, TrendDirection, TREND_MIN_SAMPLES};
use crate::ledger::{Expense, Ledger};

/// Spread assumed for a category with a single record, as a fraction of it.
const SINGLE_SAMPLE_SPREAD: f64 = 0.2;
/// Tukey fence multiplier applied to the interquartile range.
const IQR_FENCE: f64 = 1.5;
/// Inliers required before the filtered standard deviation is trusted.
const MIN_INLIERS: usize = 3;

/// Stateless training utilities that operate over [`Ledger`] snapshots.
pub struct StatisticsService;

impl StatisticsService {
    /// Trains a fresh model, or returns `None` when the ledger holds no records.
    pub fn train(ledger: &Ledger) -> Option<Model> {
        if ledger.is_empty() {
            return None;
        }

        let mut grouped: BTreeMap<&str, Vec<&Expense>> = BTreeMap::new();
        for expense in ledger.expenses() {
            grouped
                .entry(expense.category.as_str())
                .or_default()
                .push(expense);
        }

        let categories = grouped
            .into_iter()
            .map(|(label, mut records)| {
                // Stable: equal timestamps keep insertion order.
                records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                let amounts: Vec<f64> = records.iter().map(|expense| expense.amount).collect();
                (label.to_string(), Self::category_stats(&amounts))
            })
            .collect();

        let model = Model::new(categories, ledger);
        debug!(
            categories = model.category_count(),
            records = model.record_count(),
            "model retrained"
        );
        Some(model)
    }

    /// Summarises one category. `amounts` must be ordered most recent first.
    pub fn category_stats(amounts: &[f64]) -> CategoryStats {
        let average = Self::recency_weighted_average(amounts);
        let dispersion = Self::robust_dispersion(amounts, average);
        let trend = (amounts.len() >= TREND_MIN_SAMPLES).then(|| Self::trend(amounts));
        CategoryStats {
            sample_count: amounts.len(),
            average,
            dispersion,
            trend,
        }
    }

    /// Weighted mean where the record at recency rank `r` weighs `1 / (r + 1)`.
    pub fn recency_weighted_average(amounts: &[f64]) -> f64 {
        let (weighted_sum, weight_sum) =
            amounts
                .iter()
                .enumerate()
                .fold((0.0, 0.0), |(sum, weights), (rank, amount)| {
                    let weight = 1.0 / (rank as f64 + 1.0);
                    (sum + amount * weight, weights + weight)
                });
        if weight_sum > 0.0 {
            weighted_sum / weight_sum
        } else {
            0.0
        }
    }

    /// Standard deviation after discarding values outside the 1.5×IQR fences.
    ///
    /// With fewer than three inliers the unfiltered amounts are measured around
    /// `weighted_average` instead. A lone record gets a fixed 20% spread.
    pub fn robust_dispersion(amounts: &[f64], weighted_average: f64) -> f64 {
        match amounts {
            [] => 0.0,
            [single] => single * SINGLE_SAMPLE_SPREAD,
            _ => {
                let mut sorted = amounts.to_vec();
                sorted.sort_by(|a, b| a.total_cmp(b));
                let n = sorted.len();
                let q1 = sorted[n / 4];
                let q3 = sorted[n * 3 / 4];
                let iqr = q3 - q1;
                let lower = q1 - IQR_FENCE * iqr;
                let upper = q3 + IQR_FENCE * iqr;

                let inliers: Vec<f64> = sorted
                    .iter()
                    .copied()
                    .filter(|amount| *amount >= lower && *amount <= upper)
                    .collect();

                if inliers.len() >= MIN_INLIERS {
                    population_std_dev(&inliers, mean(&inliers))
                } else {
                    population_std_dev(amounts, weighted_average)
                }
            }
        }
    }

    /// Compares the recent half (ceiling split) with the older half.
    /// `amounts` must be ordered most recent first.
    pub fn trend(amounts: &[f64]) -> Trend {
        let split = amounts.len().div_ceil(2);
        let (recent, older) = amounts.split_at(split);
        if recent.is_empty() || older.is_empty() {
            return Trend::stable();
        }
        let recent_mean = mean(recent);
        let older_mean = mean(older);

        let direction = if recent_mean > older_mean {
            TrendDirection::Increasing
        } else if recent_mean < older_mean {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };
        let magnitude_percent = if older_mean > 0.0 {
            (recent_mean - older_mean) / older_mean * 100.0
        } else {
            0.0
        };
        Trend {
            direction,
            magnitude_percent,
        }
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub(crate) fn population_std_dev(values: &[f64], center: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|value| (value - center).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}
