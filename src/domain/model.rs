use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;

/// Direction of a category's recent spending relative to its older history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        };
        f.write_str(label)
    }
}

/// Recent-half versus older-half comparison. `magnitude_percent` is signed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Trend {
    pub direction: TrendDirection,
    pub magnitude_percent: f64,
}

impl Trend {
    pub fn stable() -> Self {
        Self::default()
    }
}

/// Learned summary of one category's spending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryStats {
    pub sample_count: usize,
    /// Recency-weighted mean.
    pub average: f64,
    /// Outlier-robust standard deviation.
    pub dispersion: f64,
    /// Present only for categories with at least three records.
    pub trend: Option<Trend>,
}

impl CategoryStats {
    /// Trend as seen by consumers: a missing trend reads as stable/0.
    pub fn effective_trend(&self) -> Trend {
        self.trend.unwrap_or_default()
    }
}

/// Snapshot of per-category statistics produced by a complete training pass.
/// Holds nothing beyond what the ledger it was built from implies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    categories: BTreeMap<String, CategoryStats>,
    record_count: usize,
    /// Fingerprint of the training ledger. Not persisted: a deserialized
    /// model is never treated as current for any ledger.
    #[serde(skip)]
    trained_on: Option<u64>,
}

impl Model {
    pub(crate) fn new(categories: BTreeMap<String, CategoryStats>, ledger: &Ledger) -> Self {
        Self {
            categories,
            record_count: ledger.len(),
            trained_on: Some(ledger.fingerprint()),
        }
    }

    /// Whether this model was trained on exactly the records in `ledger`.
    pub fn is_current_for(&self, ledger: &Ledger) -> bool {
        self.record_count == ledger.len() && self.trained_on == Some(ledger.fingerprint())
    }

    pub fn stats(&self, category: &str) -> Option<&CategoryStats> {
        self.categories.get(category)
    }

    /// Categories in label order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &CategoryStats)> {
        self.categories
            .iter()
            .map(|(label, stats)| (label.as_str(), stats))
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Number of ledger records the model was trained on.
    pub fn record_count(&self) -> usize {
        self.record_count
    }
}
