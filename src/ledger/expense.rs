use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded expense. Records are immutable once stored; the only
/// lifecycle change is removal from the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub flagged_anomalous: bool,
}

impl Expense {
    pub fn new(
        category: impl Into<String>,
        amount: f64,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            amount,
            description: description.into(),
            timestamp,
            flagged_anomalous: false,
        }
    }

    pub fn flagged(mut self, anomalous: bool) -> Self {
        self.flagged_anomalous = anomalous;
        self
    }

    pub fn belongs_to(&self, category: &str) -> bool {
        self.category == category
    }
}

/// User-submitted expense details prior to validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseDraft {
    pub category: String,
    pub amount: f64,
    pub description: String,
    /// Explicit point in time; the session clock is used when absent.
    pub timestamp: Option<DateTime<Utc>>,
}

impl ExpenseDraft {
    pub fn new(category: impl Into<String>, amount: f64, description: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            amount,
            description: description.into(),
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
