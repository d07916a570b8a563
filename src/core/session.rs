//! Explicit per-user session state: budget, ledger, categories and the model
//! trained from them. Every mutation rebuilds the model from scratch.

use std::path::Path;

use tracing::{info, warn};
use uuid::Uuid;

use crate::core::services::{
    AnomalyService, CategoryService, ConfidenceService, ExpenseService, HealthService,
    PredictionService, ServiceError, ServiceResult, StatisticsService,
};
use crate::core::time::{Clock, SystemClock};
use crate::currency::MoneyFormat;
use crate::domain::{
    AnomalyVerdict, ExpenseQuery, ExpenseSummary, HealthReport, Model, Prediction,
};
use crate::ledger::{CategorySet, Expense, ExpenseDraft, Ledger};
use crate::utils::persistence::{
    load_snapshot_from_file, save_snapshot_to_file, Snapshot, CURRENT_SCHEMA_VERSION,
};

/// Result of the first phase of adding an expense.
#[derive(Debug, Clone, PartialEq)]
pub enum AddExpenseOutcome {
    Recorded(Expense),
    /// The amount looks anomalous; nothing was stored. Resubmit with
    /// `force = true` to record it anyway.
    NeedsConfirmation(AnomalyVerdict),
}

pub struct BudgetSession {
    total_budget: f64,
    ledger: Ledger,
    categories: CategorySet,
    model: Option<Model>,
    clock: Box<dyn Clock>,
    money: MoneyFormat,
}

impl Default for BudgetSession {
    fn default() -> Self {
        Self::new(Box::new(SystemClock))
    }
}

impl BudgetSession {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            total_budget: 0.0,
            ledger: Ledger::new(),
            categories: CategorySet::new(),
            model: None,
            clock,
            money: MoneyFormat::default(),
        }
    }

    pub fn with_money_format(mut self, money: MoneyFormat) -> Self {
        self.money = money;
        self
    }

    pub fn total_budget(&self) -> f64 {
        self.total_budget
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Latest completed training result; `None` while the ledger is empty.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn money_format(&self) -> &MoneyFormat {
        &self.money
    }

    pub fn set_budget(&mut self, amount: f64) -> ServiceResult<()> {
        if !amount.is_finite() || amount <= 0.0 {
            warn!(amount, "rejected budget");
            return Err(ServiceError::InvalidBudget(amount));
        }
        self.total_budget = amount;
        info!(amount, "budget set");
        Ok(())
    }

    pub fn add_category(&mut self, label: &str) -> ServiceResult<String> {
        let label = CategoryService::add(&mut self.categories, label)?;
        info!(category = %label, "category added");
        Ok(label)
    }

    /// Validates and records an expense.
    ///
    /// The draft is first checked for anomalies; an anomalous amount is only
    /// stored when `force` is set, and is then flagged on the record.
    pub fn add_expense(
        &mut self,
        draft: ExpenseDraft,
        force: bool,
    ) -> ServiceResult<AddExpenseOutcome> {
        let draft = ExpenseService::validate(&draft, &self.categories).map_err(|err| {
            warn!(error = %err, "rejected expense");
            err
        })?;

        let verdict = AnomalyService::check(
            draft.amount,
            &draft.category,
            &self.ledger,
            self.model.as_ref(),
        );
        if verdict.is_anomalous && !force {
            warn!(
                category = %draft.category,
                amount = draft.amount,
                higher = verdict.is_higher,
                "expense held for confirmation"
            );
            return Ok(AddExpenseOutcome::NeedsConfirmation(verdict));
        }

        let timestamp = draft.timestamp.unwrap_or_else(|| self.clock.now());
        let expense = Expense::new(draft.category, draft.amount, draft.description, timestamp)
            .flagged(verdict.is_anomalous);
        self.ledger.add(expense.clone());
        self.retrain();
        info!(
            id = %expense.id,
            category = %expense.category,
            amount = expense.amount,
            anomalous = expense.flagged_anomalous,
            "expense recorded"
        );
        Ok(AddExpenseOutcome::Recorded(expense))
    }

    pub fn delete_expense(&mut self, id: Uuid) -> ServiceResult<Expense> {
        let removed = self
            .ledger
            .remove(id)
            .ok_or(ServiceError::ExpenseNotFound(id))?;
        self.retrain();
        info!(id = %id, "expense deleted");
        Ok(removed)
    }

    pub fn predict(&self, category: &str) -> Option<Prediction> {
        let category = CategorySet::normalize(category);
        PredictionService::predict(&category, self.model.as_ref(), &self.ledger)
    }

    pub fn confidence(&self, category: &str) -> f64 {
        ConfidenceService::confidence(&CategorySet::normalize(category), &self.ledger)
    }

    pub fn check_anomaly(&self, amount: f64, category: &str) -> ServiceResult<AnomalyVerdict> {
        let amount = ExpenseService::validate_amount(amount)?;
        let category = CategorySet::normalize(category);
        if category.is_empty() {
            return Err(ServiceError::EmptyCategory);
        }
        Ok(AnomalyService::check(
            amount,
            &category,
            &self.ledger,
            self.model.as_ref(),
        ))
    }

    /// Health report, or `None` until a budget has been set.
    pub fn evaluate_health(&self) -> Option<HealthReport> {
        if self.total_budget <= 0.0 {
            return None;
        }
        Some(HealthService::evaluate_with_format(
            self.total_budget,
            &self.ledger,
            self.model.as_ref(),
            self.clock.as_ref(),
            &self.money,
        ))
    }

    pub fn query(&self, query: &ExpenseQuery) -> Vec<&Expense> {
        ExpenseService::query(&self.ledger, query)
    }

    pub fn summarize(&self, query: &ExpenseQuery) -> ExpenseSummary {
        let view = ExpenseService::query(&self.ledger, query);
        ExpenseService::summarize(&self.ledger, &view)
    }

    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot {
            total_budget: self.total_budget,
            expenses: self.ledger.clone(),
            categories: self.categories.clone(),
            export_date: self.clock.now(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Replaces the session state with `snapshot`. Records whose category is
    /// no longer registered are kept as-is.
    pub fn import_snapshot(&mut self, snapshot: Snapshot) -> ServiceResult<()> {
        snapshot.validate()?;
        self.total_budget = snapshot.total_budget;
        self.ledger = snapshot.expenses;
        self.categories = snapshot.categories;
        self.retrain();
        info!(
            records = self.ledger.len(),
            categories = self.categories.len(),
            "snapshot imported"
        );
        Ok(())
    }

    pub fn save_snapshot(&self, path: &Path) -> ServiceResult<()> {
        save_snapshot_to_file(&self.export_snapshot(), path)?;
        info!(path = %path.display(), "snapshot exported");
        Ok(())
    }

    pub fn load_snapshot(&mut self, path: &Path) -> ServiceResult<()> {
        let snapshot = load_snapshot_from_file(path)?;
        self.import_snapshot(snapshot)
    }

    fn retrain(&mut self) {
        self.model = StatisticsService::train(&self.ledger);
    }
}
