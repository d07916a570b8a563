use serde::{Deserialize, Serialize};

/// Display-rounded band of typical amounts for a category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TypicalRange {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

/// Outcome of checking a candidate amount against a category's history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct AnomalyVerdict {
    pub is_anomalous: bool,
    pub is_higher: bool,
    /// Absent when the category has no history to compare against.
    pub typical_range: Option<TypicalRange>,
}

impl AnomalyVerdict {
    /// Verdict used when there is no basis for comparison.
    pub fn unremarkable() -> Self {
        Self::default()
    }
}
