use crate::currency::{round_amount, round_percent};
use crate::domain::{CategoryStats, Model, Prediction, Trend, TrendDirection};
use crate::ledger::Ledger;

use super::{ConfidenceService, StatisticsService};

/// Confidence a category needs before its trend shifts the expectation.
const TREND_CONFIDENCE_FLOOR: f64 = 30.0;
/// Largest fraction by which a trend may move the expectation.
const MAX_TREND_ADJUSTMENT: f64 = 0.2;

/// Full-precision prediction used internally before display rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Estimate {
    pub expected_amount: f64,
    pub confidence: f64,
    pub suggested_min: f64,
    pub suggested_max: f64,
    pub trend: Trend,
    pub sample_count: usize,
}

impl Estimate {
    fn into_prediction(self, category: &str) -> Prediction {
        Prediction {
            category: category.to_string(),
            expected_amount: round_amount(self.expected_amount),
            confidence_percent: round_percent(self.confidence),
            suggested_min: round_amount(self.suggested_min),
            suggested_max: round_amount(self.suggested_max),
            trend_direction: self.trend.direction,
            trend_percent: round_percent(self.trend.magnitude_percent.abs()),
            sample_count: self.sample_count,
        }
    }
}

/// Multiplier on dispersion that widens ranges as confidence drops:
/// 1 at full confidence, 3 at 25%.
pub(crate) fn range_factor(confidence: f64) -> f64 {
    ((100.0 - confidence) / 25.0).max(1.0)
}

pub struct PredictionService;

impl PredictionService {
    /// Predicts the next expense for `category`.
    ///
    /// Returns `None` only when the ledger holds no records at all. A missing
    /// or stale `model` is retrained from `ledger` first. Categories without
    /// history predict 0 with zero confidence.
    pub fn predict(category: &str, model: Option<&Model>, ledger: &Ledger) -> Option<Prediction> {
        Self::estimate(category, model, ledger).map(|estimate| estimate.into_prediction(category))
    }

    pub(crate) fn estimate(
        category: &str,
        model: Option<&Model>,
        ledger: &Ledger,
    ) -> Option<Estimate> {
        if ledger.is_empty() {
            return None;
        }
        let retrained;
        let model = match model {
            Some(model) if model.is_current_for(ledger) => model,
            _ => {
                retrained = StatisticsService::train(ledger)?;
                &retrained
            }
        };

        let confidence = ConfidenceService::confidence(category, ledger);
        let stats = model.stats(category);
        let average = stats.map_or(0.0, |stats| stats.average);
        let dispersion = stats.map_or(0.0, |stats| stats.dispersion);
        let trend = stats
            .map(CategoryStats::effective_trend)
            .unwrap_or_default();

        let expected_amount = Self::apply_trend(average, confidence, trend);
        let spread = range_factor(confidence) * dispersion;

        Some(Estimate {
            expected_amount,
            confidence,
            suggested_min: (expected_amount - spread).max(0.0),
            suggested_max: expected_amount + spread,
            trend,
            sample_count: stats.map_or(0, |stats| stats.sample_count),
        })
    }

    fn apply_trend(average: f64, confidence: f64, trend: Trend) -> f64 {
        if confidence <= TREND_CONFIDENCE_FLOOR || trend.magnitude_percent == 0.0 {
            return average;
        }
        let adjustment = (trend.magnitude_percent.abs() / 100.0).min(MAX_TREND_ADJUSTMENT);
        match trend.direction {
            TrendDirection::Increasing => average * (1.0 + adjustment),
            TrendDirection::Decreasing => average * (1.0 - adjustment),
            TrendDirection::Stable => average,
        }
    }
}
