use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordering applied when listing expenses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date-desc" => Ok(SortOrder::DateDesc),
            "date-asc" => Ok(SortOrder::DateAsc),
            "amount-desc" => Ok(SortOrder::AmountDesc),
            "amount-asc" => Ok(SortOrder::AmountAsc),
            other => Err(format!("unknown sort order `{other}`")),
        }
    }
}

/// Category filter plus ordering. `category: None` means all categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseQuery {
    pub category: Option<String>,
    pub sort: SortOrder,
}

impl ExpenseQuery {
    pub fn all(sort: SortOrder) -> Self {
        Self {
            category: None,
            sort,
        }
    }

    pub fn in_category(category: impl Into<String>, sort: SortOrder) -> Self {
        Self {
            category: Some(category.into()),
            sort,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    /// Share of the whole ledger's spend, not just the filtered subset.
    pub percent_of_total: f64,
}

/// Totals over a filtered view of the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseSummary {
    pub expense_count: usize,
    pub total_count: usize,
    pub filtered_amount: f64,
    /// Present only when the view is a strict subset of the ledger.
    pub share_of_total_percent: Option<f64>,
    pub breakdown: Vec<CategoryShare>,
}
