use std::fmt;

use serde::{Deserialize, Serialize};

/// Budget status bucket, from spend utilization against elapsed month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Critical,
    Warning,
    Good,
    Excellent,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthStatus::Critical => "CRITICAL",
            HealthStatus::Warning => "WARNING",
            HealthStatus::Good => "GOOD",
            HealthStatus::Excellent => "EXCELLENT",
        };
        f.write_str(label)
    }
}

/// Projected runway at the current burn rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DaysRemaining {
    /// Whole days until the budget runs out. Negative once spending has
    /// passed the budget.
    Days(i64),
    /// Nothing has been spent yet, so the budget never depletes.
    Unbounded,
}

impl DaysRemaining {
    pub fn days(self) -> Option<i64> {
        match self {
            DaysRemaining::Days(days) => Some(days),
            DaysRemaining::Unbounded => None,
        }
    }

    pub fn is_overspent(self) -> bool {
        matches!(self, DaysRemaining::Days(days) if days < 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopCategory {
    pub category: String,
    pub amount: f64,
    /// Share of total spend.
    pub percent: f64,
}

/// A category whose current total strays from its learned average.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryAnomaly {
    pub category: String,
    pub is_high: bool,
    pub deviation_percent: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Action,
    Caution,
    Encouragement,
    Insight,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
}

impl Recommendation {
    pub fn new(kind: RecommendationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Budget health facts plus the recommendation set derived from them.
/// Amounts are rounded to cents and percentages to one decimal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining_budget: f64,
    pub utilization_percent: f64,
    pub month_progress_percent: f64,
    pub status: HealthStatus,
    pub spending_ahead_of_schedule: bool,
    pub burn_rate: f64,
    pub days_remaining: DaysRemaining,
    pub top_categories: Vec<TopCategory>,
    pub anomalous_categories: Vec<CategoryAnomaly>,
    pub headline: String,
    pub recommendations: Vec<Recommendation>,
}
