use std::collections::BTreeMap;

use crate::currency::{round_amount, round_percent};
use crate::domain::{CategoryShare, ExpenseQuery, ExpenseSummary, SortOrder};
use crate::ledger::{CategorySet, Expense, ExpenseDraft, Ledger};

use super::{CategoryService, ServiceError, ServiceResult};

pub struct ExpenseService;

impl ExpenseService {
    /// Amounts must be finite and strictly positive.
    pub fn validate_amount(amount: f64) -> ServiceResult<f64> {
        if amount.is_finite() && amount > 0.0 {
            Ok(amount)
        } else {
            Err(ServiceError::InvalidAmount(amount))
        }
    }

    /// Checks a draft and returns it with its category and description normalised.
    pub fn validate(draft: &ExpenseDraft, categories: &CategorySet) -> ServiceResult<ExpenseDraft> {
        let amount = Self::validate_amount(draft.amount)?;
        let category = CategoryService::require_registered(categories, &draft.category)?;
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(ServiceError::EmptyDescription);
        }
        Ok(ExpenseDraft {
            category,
            amount,
            description: description.to_string(),
            timestamp: draft.timestamp,
        })
    }

    /// Filters by category and orders the result. Sorting is stable, so equal
    /// keys keep ledger order.
    pub fn query<'a>(ledger: &'a Ledger, query: &ExpenseQuery) -> Vec<&'a Expense> {
        let mut selected: Vec<&Expense> = ledger
            .expenses()
            .iter()
            .filter(|expense| {
                query
                    .category
                    .as_deref()
                    .map_or(true, |category| expense.belongs_to(category))
            })
            .collect();

        match query.sort {
            SortOrder::DateDesc => selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortOrder::DateAsc => selected.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            SortOrder::AmountDesc => selected.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
            SortOrder::AmountAsc => selected.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
        }
        selected
    }

    /// Summarises `view`, a subset of `ledger`. Category shares are measured
    /// against the whole ledger.
    pub fn summarize(ledger: &Ledger, view: &[&Expense]) -> ExpenseSummary {
        let ledger_total = ledger.total_spent();
        let filtered_amount: f64 = view.iter().map(|expense| expense.amount).sum();
        let share = |amount: f64| {
            if ledger_total > 0.0 {
                round_percent(amount / ledger_total * 100.0)
            } else {
                0.0
            }
        };

        let mut per_category: BTreeMap<&str, f64> = BTreeMap::new();
        for expense in view {
            *per_category.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
        }

        ExpenseSummary {
            expense_count: view.len(),
            total_count: ledger.len(),
            filtered_amount: round_amount(filtered_amount),
            share_of_total_percent: (view.len() != ledger.len()).then(|| share(filtered_amount)),
            breakdown: per_category
                .into_iter()
                .map(|(category, amount)| CategoryShare {
                    category: category.to_string(),
                    amount: round_amount(amount),
                    percent_of_total: share(amount),
                })
                .collect(),
        }
    }
}
