use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::expense::Expense;

/// Ordered, append/remove-only collection of expense records. Insertion order is
/// kept for display; statistics never depend on it except as a sort tie-break.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Ledger {
    expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, expense: Expense) -> Uuid {
        let id = expense.id;
        self.expenses.push(expense);
        id
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Expense> {
        let index = self.expenses.iter().position(|expense| expense.id == id)?;
        Some(self.expenses.remove(index))
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Records of one category, in insertion order.
    pub fn for_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Expense> + 'a {
        self.expenses
            .iter()
            .filter(move |expense| expense.belongs_to(category))
    }

    pub fn count_for(&self, category: &str) -> usize {
        self.for_category(category).count()
    }

    pub fn total_spent(&self) -> f64 {
        self.expenses.iter().map(|expense| expense.amount).sum()
    }

    /// Per-category spend, keyed by label so iteration order is deterministic.
    pub fn category_totals(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for expense in &self.expenses {
            *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
        }
        totals
    }

    pub fn oldest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.expenses.iter().map(|expense| expense.timestamp).min()
    }

    /// Digest of every record's id, category, amount and timestamp, in order.
    /// Two ledgers with the same fingerprint train the same model.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.expenses.len().hash(&mut hasher);
        for expense in &self.expenses {
            expense.id.hash(&mut hasher);
            expense.category.hash(&mut hasher);
            expense.amount.to_bits().hash(&mut hasher);
            expense.timestamp.hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl FromIterator<Expense> for Ledger {
    fn from_iter<T: IntoIterator<Item = Expense>>(iter: T) -> Self {
        Self {
            expenses: iter.into_iter().collect(),
        }
    }
}
