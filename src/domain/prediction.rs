use serde::{Deserialize, Serialize};

use super::model::TrendDirection;

/// Records needed before a category's trend is reported.
pub const TREND_MIN_SAMPLES: usize = 3;

/// Forward-looking estimate for a category, rounded for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub category: String,
    pub expected_amount: f64,
    pub confidence_percent: f64,
    pub suggested_min: f64,
    pub suggested_max: f64,
    pub trend_direction: TrendDirection,
    /// Absolute trend magnitude; the sign lives in `trend_direction`.
    pub trend_percent: f64,
    pub sample_count: usize,
}

/// Qualitative reading of a prediction's confidence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PredictionOutlook {
    Limited,
    Moderate,
    Strong,
}

impl Prediction {
    pub fn outlook(&self) -> PredictionOutlook {
        if self.confidence_percent < 40.0 {
            PredictionOutlook::Limited
        } else if self.confidence_percent < 70.0 {
            PredictionOutlook::Moderate
        } else {
            PredictionOutlook::Strong
        }
    }

    pub fn trend_analysis_available(&self) -> bool {
        self.sample_count >= TREND_MIN_SAMPLES
    }
}
